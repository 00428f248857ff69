use pastense_protocol::{Engine, Factor, Recommendation, RecommendationResult};
use serde::{Deserialize, Serialize};

use crate::error::SolverError;

const EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Multiplier applied when both simple and continuous received votes.
    pub conflict_penalty: f32,
    /// Engines this close in confidence count as comparable.
    pub comparable_margin: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            conflict_penalty: 0.7,
            comparable_margin: 0.15,
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(0.0..=1.0).contains(&self.conflict_penalty) {
            return Err(SolverError::InvalidConfig(format!(
                "conflict_penalty must be within [0, 1], got {}",
                self.conflict_penalty
            )));
        }
        if !(0.0..=1.0).contains(&self.comparable_margin) {
            return Err(SolverError::InvalidConfig(format!(
                "comparable_margin must be within [0, 1], got {}",
                self.comparable_margin
            )));
        }
        Ok(())
    }
}

const VOTABLE: [Recommendation; 3] = [
    Recommendation::PastSimple,
    Recommendation::PastContinuous,
    Recommendation::Mixed,
];

/// Summed weight and factor count for one recommendation.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    weight: f32,
    count: usize,
}

impl Tally {
    fn mean(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.weight / self.count as f32
        }
    }
}

fn tally<'a>(factors: impl Iterator<Item = &'a Factor>) -> [Tally; 3] {
    let mut tallies = [Tally::default(); 3];
    for factor in factors {
        if let Some(slot) = VOTABLE.iter().position(|r| *r == factor.recommendation) {
            tallies[slot].weight += factor.weight;
            tallies[slot].count += 1;
        }
    }
    tallies
}

/// The single highest-weight recommendation, or `None` on a tie or no votes.
fn clear_winner(tallies: &[Tally; 3]) -> Option<usize> {
    let max = tallies.iter().map(|t| t.weight).fold(0.0_f32, f32::max);
    if max <= EPSILON {
        return None;
    }
    let mut leaders = (0..3).filter(|&i| (tallies[i].weight - max).abs() <= EPSILON);
    let first = leaders.next()?;
    match leaders.next() {
        Some(_) => None,
        None => Some(first),
    }
}

/// Combine weighted votes into one recommendation.
///
/// - the recommendation with the highest summed weight wins, with confidence
///   = mean winning weight × winner share of all weight
/// - a tie, or no evidence at all, yields `either`
/// - when the connector and temporal engines each have a clear, different
///   favorite with comparable confidence, the result is `either` with their
///   averaged confidence
/// - votes for both simple and continuous apply the conflict penalty
pub fn fuse(factors: Vec<Factor>, config: &FusionConfig) -> RecommendationResult {
    let tallies = tally(factors.iter());
    let total: f32 = tallies.iter().map(|t| t.weight).sum();
    if total <= EPSILON {
        return RecommendationResult {
            factors,
            ..RecommendationResult::no_evidence()
        };
    }

    let conflicted = tallies[0].weight > EPSILON && tallies[1].weight > EPSILON;
    let penalty = if conflicted { config.conflict_penalty } else { 1.0 };

    let (primary, confidence) = match engine_disagreement(&factors, config) {
        Some(averaged) => (Recommendation::Either, averaged),
        None => match clear_winner(&tallies) {
            Some(i) => (VOTABLE[i], tallies[i].mean() * (tallies[i].weight / total)),
            None => {
                let count: usize = tallies.iter().map(|t| t.count).sum();
                (Recommendation::Either, total / count as f32)
            }
        },
    };

    RecommendationResult {
        primary,
        confidence: (confidence * penalty).clamp(0.0, 1.0),
        factors,
    }
}

/// Averaged engine confidence when the two engines clearly disagree.
fn engine_disagreement(factors: &[Factor], config: &FusionConfig) -> Option<f32> {
    let favorite = |engine: Engine| {
        let tallies = tally(factors.iter().filter(|f| f.source.engine() == engine));
        clear_winner(&tallies).map(|i| (i, tallies[i].mean()))
    };

    let (connector, connector_conf) = favorite(Engine::Connector)?;
    let (temporal, temporal_conf) = favorite(Engine::Temporal)?;

    let comparable = (connector_conf - temporal_conf).abs() <= config.comparable_margin + EPSILON;
    (connector != temporal && comparable).then(|| (connector_conf + temporal_conf) / 2.0)
}
