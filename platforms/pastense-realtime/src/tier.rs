use pastense_parser::word_count;
use pastense_protocol::AnalysisTier;
use serde::Serialize;

use crate::config::RealtimeConfig;

/// Why a request was answered with the empty projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rejection {
    TooShort,
    TooFewWords,
    TooLong,
}

pub fn char_count(text: &str) -> usize {
    text.trim().chars().count()
}

pub fn rejection(text: &str, config: &RealtimeConfig) -> Option<Rejection> {
    let chars = char_count(text);
    if chars < config.min_chars {
        Some(Rejection::TooShort)
    } else if chars > config.max_chars {
        Some(Rejection::TooLong)
    } else if word_count(text) < config.min_words {
        Some(Rejection::TooFewWords)
    } else {
        None
    }
}

/// Depth of analysis from input size alone.
pub fn select_tier(chars: usize, config: &RealtimeConfig) -> AnalysisTier {
    if chars >= config.advanced_from_chars {
        AnalysisTier::Advanced
    } else if chars >= config.intermediate_from_chars {
        AnalysisTier::Intermediate
    } else {
        AnalysisTier::Basic
    }
}
