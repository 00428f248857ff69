//! Pattern-based detection and correction of common past-tense mistakes.
//!
//! Passes run in a fixed order over one snapshot of the sentence. Each
//! pass may assume earlier passes already claimed their matches.

pub mod apply;
pub mod detector;
pub mod error;
pub mod rules;

pub use detector::{DetectionReport, DetectorConfig, ErrorDetector, PassFailure};
pub use error::RuleError;
pub use rules::{builtin_passes, Corrector, CorrectorFn, Rule, RulePass};
