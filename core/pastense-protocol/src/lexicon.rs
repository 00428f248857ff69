use rkyv::{Archive, Deserialize, Serialize};
use crate::grammar::{AuxiliaryClass, Number, Person};
use crate::recommendation::Recommendation;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct PronounEntry {
    pub word: String,
    pub person: Person,
    pub number: Number,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct IrregularVerb {
    pub base: String,
    pub past: String,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Misspelling {
    pub wrong: String,
    pub right: String,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct ConnectorEntry {
    pub word: String,
    pub recommendation: Recommendation,
    pub confidence: f32,
    /// "when": the vote depends on the rest of the sentence
    pub context_dependent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum TemporalKind {
    SpecificMoment = 0,
    Duration = 1,
    SuddenAction = 2,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TemporalMarker {
    pub phrase: String,
    pub kind: TemporalKind,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum VerbClass {
    /// Ongoing, durative (walk, study, rain)
    Activity = 0,
    /// Punctual, instantaneous (arrive, break, knock)
    Achievement = 1,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct VerbClassEntry {
    pub verb: String,
    pub class: VerbClass,
}

/// Read-only lookup tables supplied to the analysis core.
///
/// Lookups are linear scans; the tables are small and built once per engine.
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Lexicon {
    pub version: u32,
    pub pronouns: Vec<PronounEntry>,
    pub determiners: Vec<String>,
    pub past_auxiliaries: Vec<String>,
    pub present_auxiliaries: Vec<String>,
    pub negative_auxiliaries: Vec<String>,
    pub irregular_verbs: Vec<IrregularVerb>,
    /// Regular verbs in base form (irregular bases are looked up separately)
    pub base_verbs: Vec<String>,
    /// Words ending in -ed that are not past forms (need, hundred)
    pub ed_exclusions: Vec<String>,
    /// Words ending in -ing that are not gerunds (morning, thing)
    pub ing_exclusions: Vec<String>,
    pub connectors: Vec<ConnectorEntry>,
    pub time_markers: Vec<TemporalMarker>,
    pub frequency_adverbs: Vec<String>,
    /// Past forms that typically interrupt a background action (rang, knocked)
    pub interruption_verbs: Vec<String>,
    pub verb_classes: Vec<VerbClassEntry>,
    pub irregular_misspellings: Vec<Misspelling>,
    pub misspellings: Vec<Misspelling>,
    /// Plural nouns without a regular -s (children, people)
    pub irregular_plurals: Vec<String>,
    pub prepositions: Vec<String>,
}

fn contains(list: &[String], word: &str) -> bool {
    list.iter().any(|w| w == word)
}

impl Lexicon {
    pub fn pronoun(&self, word: &str) -> Option<&PronounEntry> {
        self.pronouns.iter().find(|p| p.word == word)
    }

    pub fn is_determiner(&self, word: &str) -> bool {
        contains(&self.determiners, word)
    }

    pub fn auxiliary_class(&self, word: &str) -> Option<AuxiliaryClass> {
        if contains(&self.past_auxiliaries, word) {
            Some(AuxiliaryClass::Past)
        } else if contains(&self.present_auxiliaries, word) {
            Some(AuxiliaryClass::Present)
        } else if contains(&self.negative_auxiliaries, word) {
            Some(AuxiliaryClass::Negative)
        } else {
            None
        }
    }

    /// Irregular entry whose past form is `word`.
    pub fn irregular_by_past(&self, word: &str) -> Option<&IrregularVerb> {
        self.irregular_verbs.iter().find(|v| v.past == word)
    }

    pub fn past_of_irregular(&self, base: &str) -> Option<&str> {
        self.irregular_verbs
            .iter()
            .find(|v| v.base == base)
            .map(|v| v.past.as_str())
    }

    /// Base form of any known verb, regular or irregular.
    pub fn is_base_verb(&self, word: &str) -> bool {
        contains(&self.base_verbs, word) || self.irregular_verbs.iter().any(|v| v.base == word)
    }

    pub fn is_ed_exclusion(&self, word: &str) -> bool {
        contains(&self.ed_exclusions, word)
    }

    pub fn is_ing_exclusion(&self, word: &str) -> bool {
        contains(&self.ing_exclusions, word)
    }

    pub fn connector(&self, word: &str) -> Option<&ConnectorEntry> {
        self.connectors.iter().find(|c| c.word == word)
    }

    pub fn is_irregular_plural(&self, word: &str) -> bool {
        contains(&self.irregular_plurals, word)
    }

    pub fn is_preposition(&self, word: &str) -> bool {
        contains(&self.prepositions, word)
    }

    pub fn is_frequency_adverb(&self, word: &str) -> bool {
        contains(&self.frequency_adverbs, word)
    }

    pub fn is_interruption_verb(&self, word: &str) -> bool {
        contains(&self.interruption_verbs, word)
    }

    pub fn verb_class(&self, base: &str) -> Option<VerbClass> {
        self.verb_classes
            .iter()
            .find(|v| v.verb == base)
            .map(|v| v.class)
    }

    /// Time markers split into words, longest phrase first so that
    /// "the day before yesterday" wins over "yesterday".
    pub fn time_marker_phrases(&self) -> Vec<(Vec<&str>, &TemporalMarker)> {
        let mut phrases: Vec<(Vec<&str>, &TemporalMarker)> = self
            .time_markers
            .iter()
            .map(|m| (m.phrase.split_whitespace().collect(), m))
            .collect();
        phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        phrases
    }

    /// Whether the word appears in any closed-class or verb table.
    /// Used to keep capitalized function words from passing as proper nouns.
    pub fn knows(&self, word: &str) -> bool {
        self.pronoun(word).is_some()
            || self.is_determiner(word)
            || self.auxiliary_class(word).is_some()
            || self.irregular_by_past(word).is_some()
            || self.is_base_verb(word)
            || self.connector(word).is_some()
            || self.is_frequency_adverb(word)
            || self.is_preposition(word)
            || self
                .time_markers
                .iter()
                .any(|m| m.phrase.split_whitespace().any(|w| w == word))
    }
}
