use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pastense_detector::ErrorDetector;
use pastense_parser::StructureAnalyzer;
use pastense_protocol::{AnalysisTier, ErrorKind, Lexicon};
use pastense_realtime::{read_lexicon, write_lexicon, AnalyzeOptions, RealtimeAnalyzer, RealtimeConfig};
use pastense_solver::{ContextEngine, Recommender};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Past Simple / Past Continuous sentence analysis")]
struct Cli {
    /// Orchestrator settings (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Compiled lexicon archive to use instead of the built-in tables
    #[arg(short, long, global = true, value_name = "FILE")]
    lexicon: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Full pipeline, printed as the UI projection
    Analyze {
        text: String,
        #[arg(long, value_enum)]
        level: Option<Level>,
        #[arg(long)]
        icons_only: bool,
        #[arg(long)]
        suggestions_only: bool,
        #[arg(long)]
        max_suggestions: Option<usize>,
        #[arg(long)]
        structure_only: bool,
    },
    /// Roles, tense and structural errors
    Structure { text: String },
    /// Rule-based error detection and the corrected sentence
    Detect { text: String },
    /// Past Simple vs Past Continuous recommendation with its evidence
    Recommend { text: String },
    /// Describe an error kind by its id (e.g. presentInPast)
    Explain { kind: String },
    /// Compile a JSON lexicon into a validated binary archive
    CompileLexicon {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Write the built-in lexicon as JSON
    ExportLexicon {
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Basic,
    Intermediate,
    Advanced,
}

impl From<Level> for AnalysisTier {
    fn from(level: Level) -> Self {
        match level {
            Level::Basic => AnalysisTier::Basic,
            Level::Intermediate => AnalysisTier::Intermediate,
            Level::Advanced => AnalysisTier::Advanced,
        }
    }
}

#[derive(Serialize)]
struct Explanation {
    id: &'static str,
    severity: pastense_protocol::Severity,
    explanation: &'static str,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RealtimeConfig> {
    match path {
        Some(path) => Ok(RealtimeConfig::load(path)?),
        None => Ok(RealtimeConfig::default()),
    }
}

fn load_lexicon(path: Option<&Path>) -> anyhow::Result<Lexicon> {
    let Some(path) = path else {
        return Ok(Lexicon::builtin());
    };
    let bytes = fs::read(path).with_context(|| format!("reading lexicon archive {}", path.display()))?;
    let lexicon = read_lexicon(&bytes)?;
    tracing::info!(version = lexicon.version, path = %path.display(), "lexicon loaded");
    Ok(lexicon)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn compile_lexicon(input: &Path, output: &Path) -> anyhow::Result<()> {
    let json = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let lexicon: Lexicon = serde_json::from_str(&json).context("parsing lexicon JSON")?;

    eprintln!(
        "Compiling lexicon version {} ({} irregular verbs, {} base verbs)...",
        lexicon.version,
        lexicon.irregular_verbs.len(),
        lexicon.base_verbs.len()
    );
    let bytes = write_lexicon(&lexicon)?;
    // Make sure what we wrote is readable before handing it out
    read_lexicon(&bytes)?;

    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    eprintln!("Archive written to {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze {
            text,
            level,
            icons_only,
            suggestions_only,
            max_suggestions,
            structure_only,
        } => {
            let lexicon = load_lexicon(cli.lexicon.as_deref())?;
            let analyzer = RealtimeAnalyzer::new(lexicon, config)?;
            let options = AnalyzeOptions {
                level: level.map(AnalysisTier::from),
                icons_only,
                suggestions_only,
                max_suggestions,
                structure_only,
            };
            print_json(&analyzer.analyze(&text, None, &options))?;
            tracing::debug!(metrics = ?analyzer.metrics(), "done");
        }
        Command::Structure { text } => {
            let lexicon = load_lexicon(cli.lexicon.as_deref())?;
            print_json(&StructureAnalyzer::new(&lexicon).analyze(&text))?;
        }
        Command::Detect { text } => {
            let lexicon = Arc::new(load_lexicon(cli.lexicon.as_deref())?);
            let detector = ErrorDetector::new(lexicon, config.detector)?;
            print_json(&detector.detect_all(&text))?;
        }
        Command::Recommend { text } => {
            let lexicon = Arc::new(load_lexicon(cli.lexicon.as_deref())?);
            let structure = StructureAnalyzer::new(&lexicon).analyze(&text);
            let engine = ContextEngine::new(Arc::clone(&lexicon), config.fusion)?;
            print_json(&engine.recommend(&text, &structure)?)?;
        }
        Command::Explain { kind } => {
            let kind: ErrorKind = kind.parse()?;
            print_json(&Explanation {
                id: kind.id(),
                severity: kind.severity(),
                explanation: kind.explanation(),
            })?;
        }
        Command::CompileLexicon { input, output } => compile_lexicon(&input, &output)?,
        Command::ExportLexicon { output } => {
            let json = serde_json::to_string_pretty(&Lexicon::builtin())?;
            match output {
                Some(path) => fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?,
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_analyze_options() {
        let cli = Cli::try_parse_from([
            "pastense", "analyze", "I was walk", "--level", "advanced", "--max-suggestions", "2", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Analyze { text, level, max_suggestions, .. } => {
                assert_eq!(text, "I was walk");
                assert_eq!(level.map(AnalysisTier::from), Some(AnalysisTier::Advanced));
                assert_eq!(max_suggestions, Some(2));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_unknown_kind_is_not_found() {
        let cli = Cli::try_parse_from(["pastense", "explain", "pastPerfect"]).unwrap();
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("Unknown key: pastPerfect"));
    }

    #[test]
    fn test_exported_lexicon_compiles() {
        let dir = std::env::temp_dir().join(format!("pastense-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let json = dir.join("lexicon.json");
        let archive = dir.join("lexicon.rkyv");

        fs::write(&json, serde_json::to_string(&Lexicon::builtin()).unwrap()).unwrap();
        compile_lexicon(&json, &archive).unwrap();

        let lexicon = load_lexicon(Some(&archive)).unwrap();
        assert_eq!(lexicon.version, Lexicon::builtin().version);
        fs::remove_dir_all(&dir).unwrap();
    }
}
