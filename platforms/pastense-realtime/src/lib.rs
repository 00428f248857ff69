//! # Pastense Realtime
//!
//! Request orchestration for the analysis pipeline: input rejection, tier
//! selection, the shared projection cache, incremental reuse and fault
//! isolation around each stage.
//!
//! ```no_run
//! use pastense_realtime::{AnalyzeOptions, RealtimeAnalyzer, RealtimeConfig};
//!
//! let analyzer = RealtimeAnalyzer::builtin(RealtimeConfig::default())?;
//! let projection = analyzer.analyze("I was walk home", None, &AnalyzeOptions::default());
//! println!("{}%", projection.completion);
//! # Ok::<(), pastense_realtime::RealtimeError>(())
//! ```

pub mod archive;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod incremental;
pub mod metrics;
pub mod projection;
pub mod tier;

pub use archive::{read_lexicon, write_lexicon};
pub use cache::{AnalysisCache, Sweeper};
pub use config::RealtimeConfig;
pub use engine::RealtimeAnalyzer;
pub use error::{ConfigError, LexiconError, RealtimeError};
pub use metrics::MetricsSnapshot;
pub use projection::{AnalyzeOptions, IconState, Icons, Projection, Suggestion, SuggestionKind};
pub use tier::Rejection;
