use std::path::Path;
use std::time::Duration;

use pastense_detector::DetectorConfig;
use pastense_solver::FusionConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Orchestrator settings. Every field has a default, so a TOML file only
/// needs the keys it changes.
///
/// ```toml
/// min_chars = 3
/// cache_ttl_ms = 300000
///
/// [fusion]
/// conflict_penalty = 0.7
///
/// [detector]
/// auto_apply_threshold = 0.9
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    pub min_chars: usize,
    pub min_words: usize,
    pub max_chars: usize,
    pub intermediate_from_chars: usize,
    pub advanced_from_chars: usize,
    pub cache_ttl_ms: u64,
    pub cache_capacity: usize,
    pub sweep_interval_ms: u64,
    /// Largest word-count change that may reuse a previous result
    pub incremental_word_delta: usize,
    pub max_suggestions: usize,
    /// Soft target; only reported in metrics
    pub performance_budget_ms: u64,
    pub fusion: FusionConfig,
    pub detector: DetectorConfig,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            min_chars: 3,
            min_words: 2,
            max_chars: 500,
            intermediate_from_chars: 15,
            advanced_from_chars: 30,
            cache_ttl_ms: 300_000,
            cache_capacity: 1_000,
            sweep_interval_ms: 60_000,
            incremental_word_delta: 2,
            max_suggestions: 3,
            performance_budget_ms: 50,
            fusion: FusionConfig::default(),
            detector: DetectorConfig::default(),
        }
    }
}

impl RealtimeConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_chars > self.max_chars {
            return Err(ConfigError::Invalid(format!(
                "min_chars ({}) exceeds max_chars ({})",
                self.min_chars, self.max_chars
            )));
        }
        if self.intermediate_from_chars > self.advanced_from_chars {
            return Err(ConfigError::Invalid(format!(
                "intermediate_from_chars ({}) exceeds advanced_from_chars ({})",
                self.intermediate_from_chars, self.advanced_from_chars
            )));
        }
        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::Invalid("sweep_interval_ms must be positive".into()));
        }
        self.fusion
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}
