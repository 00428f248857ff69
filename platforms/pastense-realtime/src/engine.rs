use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use pastense_detector::ErrorDetector;
use pastense_parser::{word_count, StructureAnalyzer};
use pastense_protocol::{AnalysisTier, Lexicon};
use pastense_solver::{ContextEngine, Recommender};

use crate::archive::read_lexicon;
use crate::cache::{AnalysisCache, Sweeper};
use crate::config::RealtimeConfig;
use crate::error::RealtimeError;
use crate::incremental;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::projection::{project, Analysis, AnalyzeOptions, Projection};
use crate::tier::{char_count, rejection, select_tier};

/// The Engine Instance: owns the lexicon, the pipeline stages, the shared
/// cache and the counters. Safe to share across request threads.
pub struct RealtimeAnalyzer {
    lexicon: Arc<Lexicon>,
    detector: ErrorDetector,
    recommender: Box<dyn Recommender>,
    config: RealtimeConfig,
    cache: Arc<AnalysisCache>,
    metrics: Metrics,
    // Joined on drop
    _sweeper: Sweeper,
}

impl RealtimeAnalyzer {
    pub fn new(lexicon: Lexicon, config: RealtimeConfig) -> Result<Self, RealtimeError> {
        config.validate()?;
        let lexicon = Arc::new(lexicon);
        let detector = ErrorDetector::new(Arc::clone(&lexicon), config.detector)?;
        let recommender = Box::new(ContextEngine::new(Arc::clone(&lexicon), config.fusion)?);
        let cache = Arc::new(AnalysisCache::new(config.cache_ttl(), config.cache_capacity));
        let sweeper = Sweeper::spawn(Arc::clone(&cache), config.sweep_interval())?;

        Ok(Self {
            lexicon,
            detector,
            recommender,
            config,
            cache,
            metrics: Metrics::default(),
            _sweeper: sweeper,
        })
    }

    pub fn builtin(config: RealtimeConfig) -> Result<Self, RealtimeError> {
        Self::new(Lexicon::builtin(), config)
    }

    /// Build from a compiled lexicon archive, validating it first.
    pub fn from_archive(bytes: &[u8], config: RealtimeConfig) -> Result<Self, RealtimeError> {
        let lexicon = read_lexicon(bytes)?;
        tracing::info!(version = lexicon.version, "lexicon archive loaded");
        Self::new(lexicon, config)
    }

    pub fn with_recommender(mut self, recommender: Box<dyn Recommender>) -> Self {
        self.recommender = recommender;
        self
    }

    pub fn with_detector(mut self, detector: ErrorDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Main entry point: Text -> Projection. Never fails; faults inside a
    /// stage produce a degraded projection instead.
    #[tracing::instrument(name = "pastense.analyze", skip_all, fields(chars = text.len(), tier = tracing::field::Empty))]
    pub fn analyze(&self, text: &str, previous: Option<&Projection>, options: &AnalyzeOptions) -> Projection {
        self.metrics.record_request();

        // 1. Reject
        if let Some(reason) = rejection(text, &self.config) {
            self.metrics.record_rejected();
            tracing::debug!(?reason, "input rejected");
            return Projection::empty();
        }

        // 2. Tier
        let tier = options
            .level
            .filter(|level| *level != AnalysisTier::None)
            .unwrap_or_else(|| select_tier(char_count(text), &self.config));
        tracing::Span::current().record("tier", tracing::field::debug(tier));

        // 3. Cache
        let key = options.cache_key(text);
        if let Some(hit) = self.cache.get(&key) {
            self.metrics.record_cache_hit();
            return hit;
        }
        self.metrics.record_cache_miss();

        // 4. Incremental
        let words = word_count(text);
        if let Some(previous) = previous {
            if let Some(projection) = incremental::reuse(previous, words, self.config.incremental_word_delta) {
                self.metrics.record_incremental();
                tracing::debug!(words, "incremental update");
                return projection;
            }
        }

        // 5. Full run
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_components(text, tier, options.structure_only)
        }));

        match outcome {
            Ok(Ok(analysis)) => {
                let projection = project(&analysis, tier, words, options, self.config.max_suggestions);
                let elapsed = started.elapsed();
                self.metrics
                    .record_full_run(elapsed, Duration::from_millis(self.config.performance_budget_ms));
                tracing::debug!(?tier, elapsed_us = elapsed.as_micros() as u64, "analysis complete");

                // 6. Cache
                self.cache.insert(key, projection.clone());
                projection
            }
            Ok(Err(e)) => self.degrade(text, tier, words, options, &e.to_string()),
            Err(payload) => {
                let error = RealtimeError::Panic {
                    stage: "pipeline",
                    message: panic_message(payload.as_ref()),
                };
                self.degrade(text, tier, words, options, &error.to_string())
            }
        }
    }

    /// Run the stages the tier asks for.
    pub fn run_components(
        &self,
        text: &str,
        tier: AnalysisTier,
        structure_only: bool,
    ) -> Result<Analysis, RealtimeError> {
        let structure = StructureAnalyzer::new(&self.lexicon).analyze(text);
        if structure_only {
            return Ok(Analysis {
                structure,
                detection: None,
                recommendation: None,
            });
        }

        let detection = tier.runs_detector().then(|| self.detector.detect_all(text));
        if let Some(report) = &detection {
            if !report.failed_passes.is_empty() {
                self.metrics.record_rule_failures(report.failed_passes.len());
            }
        }

        let recommendation = if tier.runs_context() {
            Some(self.recommender.recommend(text, &structure)?)
        } else {
            None
        };

        Ok(Analysis {
            structure,
            detection,
            recommendation,
        })
    }

    /// Structure-only projection flagged as degraded, or the empty one if
    /// even the structure stage fails. Never cached.
    fn degrade(
        &self,
        text: &str,
        tier: AnalysisTier,
        words: usize,
        options: &AnalyzeOptions,
        reason: &str,
    ) -> Projection {
        tracing::warn!(%reason, "pipeline stage failed; serving fallback");
        self.metrics.record_degraded();

        let structure = panic::catch_unwind(AssertUnwindSafe(|| {
            StructureAnalyzer::new(&self.lexicon).analyze(text)
        }));
        match structure {
            Ok(structure) => {
                let analysis = Analysis {
                    structure,
                    detection: None,
                    recommendation: None,
                };
                let mut projection = project(&analysis, tier, words, options, self.config.max_suggestions);
                projection.degraded = true;
                projection
            }
            Err(_) => Projection::degraded(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastense_parser::StructureResult;
    use pastense_protocol::{Recommendation, RecommendationResult, TenseType};
    use pastense_solver::SolverError;

    fn analyzer() -> RealtimeAnalyzer {
        RealtimeAnalyzer::builtin(RealtimeConfig::default()).unwrap()
    }

    struct Failing;

    impl Recommender for Failing {
        fn recommend(&self, _: &str, _: &StructureResult) -> Result<RecommendationResult, SolverError> {
            Err(SolverError::Extractor {
                extractor: "temporal",
                reason: "table missing".into(),
            })
        }
    }

    struct Panicking;

    impl Recommender for Panicking {
        fn recommend(&self, _: &str, _: &StructureResult) -> Result<RecommendationResult, SolverError> {
            panic!("extractor blew up")
        }
    }

    const LONG: &str = "While I was walking home yesterday, it started to rain";

    #[test]
    fn test_tiers_gate_components() {
        let analyzer = analyzer();

        let basic = analyzer.analyze("I goed home", None, &AnalyzeOptions::default());
        assert_eq!(basic.tier, AnalysisTier::Basic);
        assert!(basic.corrected_sentence.is_none());
        assert!(basic.recommendation.is_none());

        let intermediate = analyzer.analyze("Yesterday I goed home", None, &AnalyzeOptions::default());
        assert_eq!(intermediate.tier, AnalysisTier::Intermediate);
        assert_eq!(intermediate.corrected_sentence.as_deref(), Some("Yesterday I went home"));
        assert!(intermediate.recommendation.is_none());

        let advanced = analyzer.analyze(LONG, None, &AnalyzeOptions::default());
        assert_eq!(advanced.tier, AnalysisTier::Advanced);
        assert!(advanced.recommendation.is_some());
    }

    #[test]
    fn test_level_overrides_size() {
        let options = AnalyzeOptions {
            level: Some(AnalysisTier::Advanced),
            ..AnalyzeOptions::default()
        };
        let projection = analyzer().analyze("I was walking", None, &options);
        assert_eq!(projection.tier, AnalysisTier::Advanced);
        assert_eq!(projection.recommendation, Some(Recommendation::PastContinuous));
    }

    #[test]
    fn test_structure_only() {
        let options = AnalyzeOptions {
            structure_only: true,
            ..AnalyzeOptions::default()
        };
        let projection = analyzer().analyze(LONG, None, &options);
        assert_eq!(projection.tense, TenseType::PastContinuous);
        assert!(projection.recommendation.is_none());
        assert!(projection.corrected_sentence.is_none());
    }

    #[test]
    fn test_stage_error_degrades_to_structure() {
        let analyzer = analyzer().with_recommender(Box::new(Failing));

        let projection = analyzer.analyze(LONG, None, &AnalyzeOptions::default());
        assert!(projection.degraded);
        assert!(!projection.is_empty);
        assert_eq!(projection.tense, TenseType::PastContinuous);
        assert!(projection.recommendation.is_none());

        // Degraded results are not cached
        analyzer.analyze(LONG, None, &AnalyzeOptions::default());
        let metrics = analyzer.metrics();
        assert_eq!(metrics.degraded, 2);
        assert_eq!(metrics.cache_hits, 0);
        assert!(analyzer.cache().is_empty());
    }

    #[test]
    fn test_panic_is_contained() {
        let analyzer = analyzer().with_recommender(Box::new(Panicking));
        let projection = analyzer.analyze(LONG, None, &AnalyzeOptions::default());
        assert!(projection.degraded);
        assert_eq!(projection.tense, TenseType::PastContinuous);

        // Short input never reaches the recommender
        let fine = analyzer.analyze("I was walking", None, &AnalyzeOptions::default());
        assert!(!fine.degraded);
    }

    #[test]
    fn test_from_archive() {
        let bytes = crate::archive::write_lexicon(&Lexicon::builtin()).unwrap();
        let analyzer = RealtimeAnalyzer::from_archive(&bytes, RealtimeConfig::default()).unwrap();
        let projection = analyzer.analyze("I was studying", None, &AnalyzeOptions::default());
        assert_eq!(projection.completion, 100);

        assert!(matches!(
            RealtimeAnalyzer::from_archive(b"nope", RealtimeConfig::default()),
            Err(RealtimeError::Lexicon(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RealtimeConfig {
            min_chars: 600,
            ..RealtimeConfig::default()
        };
        assert!(matches!(
            RealtimeAnalyzer::builtin(config),
            Err(RealtimeError::Config(_))
        ));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
