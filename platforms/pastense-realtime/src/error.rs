use std::path::PathBuf;

use pastense_detector::RuleError;
use pastense_solver::SolverError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("lexicon archive failed validation: {0}")]
    Invalid(String),

    #[error("lexicon archive could not be written: {0}")]
    Serialize(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    #[error(transparent)]
    Rules(#[from] RuleError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("failed to start cache sweeper: {0}")]
    Sweeper(#[source] std::io::Error),

    #[error("{stage} stage panicked: {message}")]
    Panic { stage: &'static str, message: String },
}
