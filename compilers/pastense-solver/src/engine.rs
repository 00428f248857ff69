use std::sync::Arc;

use pastense_parser::{normalize, StructureResult};
use pastense_protocol::{Lexicon, RecommendationResult};

use crate::error::SolverError;
use crate::extract::{connector_factors, temporal_factors, verb_factors};
use crate::fuser::{fuse, FusionConfig};
use crate::graph::AspectGraph;

/// Produces a tense recommendation for an analyzed sentence.
pub trait Recommender: Send + Sync {
    fn recommend(&self, sentence: &str, structure: &StructureResult) -> Result<RecommendationResult, SolverError>;
}

/// Connector and temporal evidence fused into one recommendation.
pub struct ContextEngine {
    lexicon: Arc<Lexicon>,
    graph: AspectGraph,
    config: FusionConfig,
}

impl ContextEngine {
    pub fn new(lexicon: Arc<Lexicon>, config: FusionConfig) -> Result<Self, SolverError> {
        config.validate()?;
        let graph = AspectGraph::from_lexicon(&lexicon);
        Ok(Self { lexicon, graph, config })
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }
}

impl Recommender for ContextEngine {
    fn recommend(&self, sentence: &str, structure: &StructureResult) -> Result<RecommendationResult, SolverError> {
        let normalized = normalize(sentence);
        let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();

        let mut factors = connector_factors(&self.lexicon, &words, structure);
        factors.extend(temporal_factors(&self.lexicon, &words));
        factors.extend(verb_factors(&self.lexicon, &self.graph, &words)?);

        let result = fuse(factors, &self.config);
        tracing::debug!(
            primary = result.primary.id(),
            confidence = result.confidence,
            factors = result.factors.len(),
            "recommendation fused"
        );
        Ok(result)
    }
}
