pub mod engine;
pub mod error;
pub mod extract;
pub mod fuser;
pub mod graph;

pub use engine::{ContextEngine, Recommender};
pub use error::SolverError;
pub use fuser::{fuse, FusionConfig};
pub use graph::{Aspect, AspectGraph, Concept, Relation};
