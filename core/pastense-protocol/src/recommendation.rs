use alloc::string::String;
use alloc::vec::Vec;
use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Recommendation {
    PastSimple = 0,
    PastContinuous = 1,
    /// Both tenses in one sentence (background action interrupted by an event)
    Mixed = 2,
    /// No evidence, or evidence too balanced to call
    Either = 3,
}

impl Recommendation {
    pub const fn id(self) -> &'static str {
        match self {
            Recommendation::PastSimple => "pastSimple",
            Recommendation::PastContinuous => "pastContinuous",
            Recommendation::Mixed => "mixed",
            Recommendation::Either => "either",
        }
    }
}

/// Which extractor produced a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum FactorSource {
    Connector,
    TemporalMarker,
    VerbSemantics,
}

/// The two independent engines whose disagreement is arbitrated by the fuser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Connector,
    Temporal,
}

impl FactorSource {
    pub const fn engine(self) -> Engine {
        match self {
            FactorSource::Connector => Engine::Connector,
            FactorSource::TemporalMarker | FactorSource::VerbSemantics => Engine::Temporal,
        }
    }
}

/// One weighted vote.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Factor {
    pub source: FactorSource,
    pub weight: f32,
    pub recommendation: Recommendation,
    /// The word or phrase that triggered the vote
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RecommendationResult {
    pub primary: Recommendation,
    /// Always within [0, 1]
    pub confidence: f32,
    pub factors: Vec<Factor>,
}

impl RecommendationResult {
    pub fn no_evidence() -> Self {
        Self {
            primary: Recommendation::Either,
            confidence: 0.0,
            factors: Vec::new(),
        }
    }

    /// The highest-weight factor agreeing with the primary recommendation.
    pub fn strongest_factor(&self) -> Option<&Factor> {
        self.factors
            .iter()
            .filter(|f| f.recommendation == self.primary)
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
    }
}
