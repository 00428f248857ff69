use alloc::string::String;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Stable identifiers for every mistake the engine can report.
///
/// The camelCase ids are consumed by external message catalogs by key lookup,
/// so they must never change once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ErrorKind {
    // Structure analysis
    PresentInPast,
    BaseVerbInPast,
    MissingSubject,
    MissingAuxiliary,
    MissingGerund,
    MissingVerb,
    // Pattern passes
    TenseMixing,
    AuxiliaryAgreement,
    IrregularVerb,
    GerundSuffix,
    AdverbOrder,
    Misspelling,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 12] = [
        ErrorKind::PresentInPast,
        ErrorKind::BaseVerbInPast,
        ErrorKind::MissingSubject,
        ErrorKind::MissingAuxiliary,
        ErrorKind::MissingGerund,
        ErrorKind::MissingVerb,
        ErrorKind::TenseMixing,
        ErrorKind::AuxiliaryAgreement,
        ErrorKind::IrregularVerb,
        ErrorKind::GerundSuffix,
        ErrorKind::AdverbOrder,
        ErrorKind::Misspelling,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            ErrorKind::PresentInPast => "presentInPast",
            ErrorKind::BaseVerbInPast => "baseVerbInPast",
            ErrorKind::MissingSubject => "missingSubject",
            ErrorKind::MissingAuxiliary => "missingAuxiliary",
            ErrorKind::MissingGerund => "missingGerund",
            ErrorKind::MissingVerb => "missingVerb",
            ErrorKind::TenseMixing => "tenseMixing",
            ErrorKind::AuxiliaryAgreement => "auxiliaryAgreement",
            ErrorKind::IrregularVerb => "irregularVerb",
            ErrorKind::GerundSuffix => "gerundSuffix",
            ErrorKind::AdverbOrder => "adverbOrder",
            ErrorKind::Misspelling => "misspelling",
        }
    }

    /// Fixed severity table. Used for ranking and reporting only.
    pub const fn severity(self) -> Severity {
        match self {
            ErrorKind::TenseMixing
            | ErrorKind::PresentInPast
            | ErrorKind::BaseVerbInPast
            | ErrorKind::MissingSubject => Severity::Critical,
            ErrorKind::AuxiliaryAgreement
            | ErrorKind::IrregularVerb
            | ErrorKind::MissingAuxiliary
            | ErrorKind::MissingGerund
            | ErrorKind::MissingVerb => Severity::High,
            ErrorKind::GerundSuffix | ErrorKind::AdverbOrder => Severity::Medium,
            ErrorKind::Misspelling => Severity::Low,
        }
    }

    pub const fn explanation(self) -> &'static str {
        match self {
            ErrorKind::PresentInPast => "A present-tense auxiliary (am/is/are) was used for a past action.",
            ErrorKind::BaseVerbInPast => "The verb is in its base form; past actions need the past form.",
            ErrorKind::MissingSubject => "The sentence has no subject.",
            ErrorKind::MissingAuxiliary => "Past Continuous needs was/were before the -ing verb.",
            ErrorKind::MissingGerund => "Past Continuous needs a verb ending in -ing after was/were.",
            ErrorKind::MissingVerb => "The sentence has no past-tense verb.",
            ErrorKind::TenseMixing => "An auxiliary was combined with a verb already in the past (-ed) form.",
            ErrorKind::AuxiliaryAgreement => "was is used with I/he/she/it, were with you/we/they.",
            ErrorKind::IrregularVerb => "This verb is irregular and does not take -ed in the past.",
            ErrorKind::GerundSuffix => "The -ing ending is missing or repeated.",
            ErrorKind::AdverbOrder => "The adverb is in an unusual position for English.",
            ErrorKind::Misspelling => "Common spelling mistake.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ErrorKind {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| LookupError::NotFound(String::from(s)))
    }
}

/// Caller asked for a key the engine does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    NotFound(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound(key) => write!(f, "Unknown key: {}", key),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LookupError {}

/// Ordered most to least serious, so ascending sorts put critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// One mistake found in the learner's sentence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DetectedError {
    pub kind: ErrorKind,
    pub message: String,
    /// Text the mistake was found in (empty for a missing role)
    pub matched: String,
    /// Byte offset of `matched` in the analyzed sentence
    pub position: usize,
    pub severity: Severity,
    pub suggestion: Option<String>,
    pub confidence: f32,
}

impl DetectedError {
    pub fn new(kind: ErrorKind, message: String, matched: String, position: usize) -> Self {
        Self {
            kind,
            message,
            matched,
            position,
            severity: kind.severity(),
            suggestion: None,
            confidence: 1.0,
        }
    }

    /// A role that should be there but is not.
    pub fn missing(kind: ErrorKind) -> Self {
        Self::new(kind, String::from(kind.explanation()), String::new(), 0)
    }

    pub fn with_suggestion(mut self, suggestion: String, confidence: f32) -> Self {
        self.suggestion = Some(suggestion);
        self.confidence = confidence;
        self
    }
}

/// A proposed replacement for one matched span.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Correction {
    pub kind: ErrorKind,
    pub original: String,
    pub replacement: String,
    pub position: usize,
    pub confidence: f32,
    /// Whether the replacement made it into the corrected sentence
    pub applied: bool,
}

impl Correction {
    pub fn end(&self) -> usize {
        self.position + self.original.len()
    }

    pub fn overlaps(&self, other: &Correction) -> bool {
        self.position < other.end() && other.position < self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for kind in ErrorKind::ALL {
            assert_eq!(kind.id().parse::<ErrorKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_id_is_not_found() {
        assert_eq!(
            "pastPerfect".parse::<ErrorKind>(),
            Err(LookupError::NotFound(String::from("pastPerfect")))
        );
    }

    #[test]
    fn severity_orders_critical_first() {
        assert!(Severity::Critical < Severity::Low);
        assert_eq!(ErrorKind::PresentInPast.severity(), Severity::Critical);
        assert_eq!(ErrorKind::Misspelling.severity(), Severity::Low);
    }

    #[test]
    fn corrections_overlap_on_shared_bytes_only() {
        let long = Correction {
            kind: ErrorKind::GerundSuffix,
            original: String::from("were walk"),
            replacement: String::from("were walking"),
            position: 2,
            confidence: 0.9,
            applied: false,
        };
        let short = Correction {
            kind: ErrorKind::AuxiliaryAgreement,
            original: String::from("I were"),
            replacement: String::from("I was"),
            position: 0,
            confidence: 0.95,
            applied: false,
        };
        let apart = Correction { position: 20, ..short.clone() };

        assert!(long.overlaps(&short));
        assert!(!long.overlaps(&apart));
    }
}
