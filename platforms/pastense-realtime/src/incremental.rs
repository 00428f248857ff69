//! Cheap reuse of a previous projection when only a word or two changed.
//!
//! Only completion is recomputed, from the icon states already known. Errors
//! introduced by the edit are not seen until the next full run.

use crate::projection::Projection;

pub fn word_delta(previous: &Projection, word_count: usize) -> usize {
    previous.word_count.abs_diff(word_count)
}

/// `None` when the previous projection cannot be reused.
pub fn reuse(previous: &Projection, word_count: usize, max_delta: usize) -> Option<Projection> {
    if previous.is_empty || previous.degraded {
        return None;
    }
    let icons = previous.icons?;
    if word_delta(previous, word_count) > max_delta {
        return None;
    }

    let mut next = previous.clone();
    next.is_incremental = true;
    next.word_count = word_count;
    next.completion = previous.tense.completion(icons.satisfied());
    // It described the previous text
    next.corrected_sentence = None;
    Some(next)
}
