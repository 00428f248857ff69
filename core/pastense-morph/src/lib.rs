#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

use alloc::string::{String, ToString};

use pastense_protocol::{Lexicon, Number, Person};

use core::fmt;

/// Regular verbs that double their final consonant before -ed / -ing.
const DOUBLING: &[&str] = &[
    "stop", "plan", "shop", "drop", "jog", "chat", "run", "swim", "sit", "get", "begin",
    "win", "hit", "cut", "put", "rob", "hug", "nod", "beg",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbForm {
    Past,
    Gerund,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MorphError {
    UnknownVerb(String),
}

impl fmt::Display for MorphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MorphError::UnknownVerb(word) => write!(f, "Not a known base verb: {}", word),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MorphError {}

/// Inflects a base verb the lexicon knows about.
pub fn inflect(lexicon: &Lexicon, base: &str, form: VerbForm) -> Result<String, MorphError> {
    if !lexicon.is_base_verb(base) {
        return Err(MorphError::UnknownVerb(base.to_string()));
    }
    Ok(match form {
        VerbForm::Past => past_form(lexicon, base),
        VerbForm::Gerund => gerund(base),
    })
}

/// Past form: irregular table first, regular spelling rules otherwise.
pub fn past_form(lexicon: &Lexicon, base: &str) -> String {
    match lexicon.past_of_irregular(base) {
        Some(past) => past.to_string(),
        None => regular_past(base),
    }
}

pub fn regular_past(base: &str) -> String {
    if base.ends_with('e') {
        format!("{}d", base)
    } else if ends_in_consonant_y(base) {
        format!("{}ied", &base[..base.len() - 1])
    } else if DOUBLING.contains(&base) {
        format!("{}{}ed", base, last_char(base))
    } else {
        format!("{}ed", base)
    }
}

pub fn gerund(base: &str) -> String {
    if let Some(stem) = base.strip_suffix("ie") {
        format!("{}ying", stem)
    } else if base.ends_with('e') && !base.ends_with("ee") && !base.ends_with("ye") && base.len() > 2 {
        format!("{}ing", &base[..base.len() - 1])
    } else if DOUBLING.contains(&base) {
        format!("{}{}ing", base, last_char(base))
    } else {
        format!("{}ing", base)
    }
}

/// Best guess at the base of a regular -ed form, preferring known verbs.
pub fn base_from_ed(lexicon: &Lexicon, word: &str) -> String {
    if let Some(entry) = lexicon.irregular_by_past(word) {
        return entry.base.clone();
    }
    let Some(stem) = word.strip_suffix("ed") else {
        return word.to_string();
    };
    for candidate in ed_candidates(stem) {
        if lexicon.is_base_verb(&candidate) {
            return candidate;
        }
    }
    // Unknown verb: "-ied" → "-y", otherwise keep the bare stem
    match stem.strip_suffix('i') {
        Some(y_stem) => format!("{}y", y_stem),
        None => stem.to_string(),
    }
}

/// "stopp" -> "stop". Compares characters, not bytes.
fn undouble(stem: &str) -> String {
    let mut chars = stem.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(last), Some(prev)) if last == prev => stem[..stem.len() - last.len_utf8()].to_string(),
        _ => stem.to_string(),
    }
}

fn ed_candidates(stem: &str) -> [String; 4] {
    let undoubled = undouble(stem);
    let y_form = match stem.strip_suffix('i') {
        Some(s) => format!("{}y", s),
        None => stem.to_string(),
    };
    [stem.to_string(), format!("{}e", stem), undoubled, y_form]
}

/// Known base verb behind any surface form (base, past, -ed, -ing).
pub fn lemmatize(lexicon: &Lexicon, word: &str) -> Option<String> {
    if lexicon.is_base_verb(word) {
        return Some(word.to_string());
    }
    if let Some(entry) = lexicon.irregular_by_past(word) {
        return Some(entry.base.clone());
    }
    if let Some(stem) = word.strip_suffix("ed") {
        return ed_candidates(stem)
            .into_iter()
            .find(|candidate| lexicon.is_base_verb(candidate));
    }
    if let Some(stem) = word.strip_suffix("ing") {
        let undoubled = undouble(stem);
        let y_to_ie = match stem.strip_suffix('y') {
            Some(s) => format!("{}ie", s),
            None => stem.to_string(),
        };
        return [stem.to_string(), format!("{}e", stem), undoubled, y_to_ie]
            .into_iter()
            .find(|candidate| lexicon.is_base_verb(candidate));
    }
    None
}

/// was / were for a subject.
pub fn past_be(person: Person, number: Number) -> &'static str {
    match (person, number) {
        (Person::Second, _) | (_, Number::Plural) => "were",
        _ => "was",
    }
}

/// Grammatical number of a noun heading a subject phrase.
pub fn noun_number(lexicon: &Lexicon, noun: &str) -> Number {
    if lexicon.is_irregular_plural(noun) {
        Number::Plural
    } else if noun.ends_with("ss") || noun.ends_with("us") || noun.ends_with("is") {
        // glass, bus, analysis
        Number::Singular
    } else if noun.ends_with('s') {
        Number::Plural
    } else {
        Number::Singular
    }
}

fn ends_in_consonant_y(word: &str) -> bool {
    match word.as_bytes() {
        [.., c, b'y'] => !matches!(c, b'a' | b'e' | b'i' | b'o' | b'u'),
        _ => false,
    }
}

fn last_char(word: &str) -> char {
    word.chars().last().unwrap_or_default()
}
