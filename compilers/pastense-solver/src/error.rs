#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("invalid fusion config: {0}")]
    InvalidConfig(String),

    #[error("verb '{verb}' has no aspect in the semantic graph")]
    MissingAspect { verb: String },

    #[error("{extractor} extractor failed: {reason}")]
    Extractor { extractor: &'static str, reason: String },
}
