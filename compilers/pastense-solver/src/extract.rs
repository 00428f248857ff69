//! Evidence extractors. Each one turns words of the sentence into weighted
//! votes; none of them decides anything on its own.

use std::ops::Range;

use pastense_morph::lemmatize;
use pastense_parser::StructureResult;
use pastense_protocol::{Factor, FactorSource, Lexicon, Recommendation, TemporalKind, TemporalMarker};

use crate::error::SolverError;
use crate::graph::{Aspect, AspectGraph};

/// Reading of a context-dependent connector such as "when".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhenPattern {
    /// "I was cooking when the phone rang"
    Interruption,
    /// "When I was living in Paris, ..."
    ContextSetting,
    /// "When she arrived, we left"
    Sequence,
}

impl WhenPattern {
    pub fn classify(lexicon: &Lexicon, words: &[&str], structure: &StructureResult) -> Self {
        let continuous = structure.has_continuous_shape();
        let interrupted = words.iter().any(|w| lexicon.is_interruption_verb(w));
        match (continuous, interrupted) {
            (true, true) => WhenPattern::Interruption,
            (true, false) => WhenPattern::ContextSetting,
            (false, _) => WhenPattern::Sequence,
        }
    }

    pub fn vote(self) -> (Recommendation, f32) {
        match self {
            WhenPattern::Interruption => (Recommendation::Mixed, 0.8),
            WhenPattern::ContextSetting => (Recommendation::PastContinuous, 0.7),
            WhenPattern::Sequence => (Recommendation::PastSimple, 0.75),
        }
    }
}

/// One vote per distinct connector word.
pub fn connector_factors(lexicon: &Lexicon, words: &[&str], structure: &StructureResult) -> Vec<Factor> {
    let mut seen: Vec<&str> = Vec::new();
    let mut factors = Vec::new();

    let markers = marker_spans(lexicon, words);
    for (i, word) in words.iter().enumerate() {
        // "before" in "the day before yesterday" belongs to the time marker
        if markers.iter().any(|(span, _)| span.contains(&i)) {
            continue;
        }
        let Some(entry) = lexicon.connector(word) else { continue };
        if seen.contains(word) {
            continue;
        }
        seen.push(word);

        let (recommendation, weight) = if entry.context_dependent {
            WhenPattern::classify(lexicon, words, structure).vote()
        } else {
            (entry.recommendation, entry.confidence)
        };

        factors.push(Factor {
            source: FactorSource::Connector,
            weight,
            recommendation,
            evidence: entry.word.clone(),
        });
    }

    factors
}

pub fn temporal_kind_vote(kind: TemporalKind) -> Recommendation {
    match kind {
        TemporalKind::SpecificMoment | TemporalKind::SuddenAction => Recommendation::PastSimple,
        TemporalKind::Duration => Recommendation::PastContinuous,
    }
}

/// Word ranges covered by time-marker phrases, longest first and non-overlapping.
fn marker_spans<'a>(lexicon: &'a Lexicon, words: &[&str]) -> Vec<(Range<usize>, &'a TemporalMarker)> {
    let phrases = lexicon.time_marker_phrases();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < words.len() {
        let hit = phrases.iter().find(|(phrase, _)| {
            let end = i + phrase.len();
            end <= words.len() && words[i..end] == phrase[..]
        });
        match hit {
            Some((phrase, marker)) => {
                spans.push((i..i + phrase.len(), *marker));
                i += phrase.len();
            }
            None => i += 1,
        }
    }

    spans
}

pub fn temporal_factors(lexicon: &Lexicon, words: &[&str]) -> Vec<Factor> {
    marker_spans(lexicon, words)
        .into_iter()
        .map(|(_, marker)| Factor {
            source: FactorSource::TemporalMarker,
            weight: marker.confidence,
            recommendation: temporal_kind_vote(marker.kind),
            evidence: marker.phrase.clone(),
        })
        .collect()
}

/// Lexical-aspect votes, one per distinct verb lemma.
pub fn verb_factors(lexicon: &Lexicon, graph: &AspectGraph, words: &[&str]) -> Result<Vec<Factor>, SolverError> {
    let mut seen: Vec<String> = Vec::new();
    let mut factors = Vec::new();

    for word in words {
        let Some(lemma) = lemmatize(lexicon, word) else { continue };
        if seen.contains(&lemma) {
            continue;
        }
        let aspect = graph.aspect_of(&lemma)?;
        seen.push(lemma.clone());

        let recommendation = match aspect {
            Some(Aspect::Durative) => Recommendation::PastContinuous,
            Some(Aspect::Punctual) => Recommendation::PastSimple,
            None => continue,
        };
        factors.push(Factor {
            source: FactorSource::VerbSemantics,
            weight: 0.6,
            recommendation,
            evidence: lemma,
        });
    }

    Ok(factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastense_parser::{normalize, StructureAnalyzer};

    fn run<T>(sentence: &str, f: impl FnOnce(&Lexicon, &[&str], &StructureResult) -> T) -> T {
        let lexicon = Lexicon::builtin();
        let structure = StructureAnalyzer::new(&lexicon).analyze(sentence);
        let normalized = normalize(sentence);
        let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();
        f(&lexicon, &words, &structure)
    }

    fn votes(factors: &[Factor]) -> Vec<(&str, Recommendation, f32)> {
        factors
            .iter()
            .map(|f| (f.evidence.as_str(), f.recommendation, f.weight))
            .collect()
    }

    #[test]
    fn test_fixed_connectors() {
        let factors = run("While I was reading, as usual, the cat slept", |lex, words, s| {
            connector_factors(lex, words, s)
        });
        assert_eq!(
            votes(&factors),
            vec![
                ("while", Recommendation::PastContinuous, 0.9),
                ("as", Recommendation::PastContinuous, 0.85),
            ]
        );
    }

    #[test]
    fn test_when_patterns() {
        let interruption = run("I was cooking when the phone rang", |lex, words, s| {
            connector_factors(lex, words, s)
        });
        assert_eq!(votes(&interruption), vec![("when", Recommendation::Mixed, 0.8)]);

        let context = run("When I was living in Paris I was happy", |lex, words, s| {
            connector_factors(lex, words, s)
        });
        assert_eq!(votes(&context), vec![("when", Recommendation::PastContinuous, 0.7)]);

        let sequence = run("When she arrived we left", |lex, words, s| {
            connector_factors(lex, words, s)
        });
        assert_eq!(votes(&sequence), vec![("when", Recommendation::PastSimple, 0.75)]);
    }

    #[test]
    fn test_longest_time_marker_wins() {
        let factors = run("The day before yesterday I stayed home all day", |lex, words, _| {
            temporal_factors(lex, words)
        });
        assert_eq!(
            votes(&factors),
            vec![
                ("the day before yesterday", Recommendation::PastSimple, 0.8),
                ("all day", Recommendation::PastContinuous, 0.8),
            ]
        );
    }

    #[test]
    fn test_connector_words_inside_markers_do_not_vote() {
        let factors = run("I went home the day before yesterday", |lex, words, s| {
            connector_factors(lex, words, s)
        });
        assert!(factors.is_empty());

        let factors = run("I ate before I left", |lex, words, s| connector_factors(lex, words, s));
        assert_eq!(votes(&factors), vec![("before", Recommendation::PastSimple, 0.6)]);
    }

    #[test]
    fn test_sudden_action_marker() {
        let factors = run("Suddenly the lights went out", |lex, words, _| temporal_factors(lex, words));
        assert_eq!(votes(&factors), vec![("suddenly", Recommendation::PastSimple, 0.85)]);
    }

    #[test]
    fn test_verb_semantics_one_vote_per_lemma() {
        let graph = AspectGraph::from_lexicon(&Lexicon::builtin());
        let factors = run("I walked and walked until the bus arrived", |lex, words, _| {
            verb_factors(lex, &graph, words).unwrap()
        });
        assert_eq!(
            votes(&factors),
            vec![
                ("walk", Recommendation::PastContinuous, 0.6),
                ("arrive", Recommendation::PastSimple, 0.6),
            ]
        );
    }
}
