/// Errors raised while building or running a rule.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("rule '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{rule}' has no replacement for '{matched}'")]
    MissingReplacement { rule: String, matched: String },

    #[error("rule '{rule}' failed: {reason}")]
    Corrector { rule: String, reason: String },
}
