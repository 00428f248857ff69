//! Rule tables for the error detector.
//!
//! A rule is data: a pattern, the error kind it reports, an explanation and a
//! corrector. Rules are grouped into passes that run in a fixed order.

use std::collections::HashMap;

use pastense_morph::{base_from_ed, gerund, lemmatize};
use pastense_protocol::{ErrorKind, Lexicon, Misspelling};
use regex::{Captures, Regex};

use crate::error::RuleError;

/// Custom corrector. `Ok(None)` means the match is not a mistake after all.
pub type CorrectorFn = fn(&Captures<'_>, &Lexicon) -> Result<Option<String>, RuleError>;

pub enum Corrector {
    /// Capture expansion, e.g. `"$1 was"`.
    Template(String),
    /// Whole match (lowercased) mapped to a replacement.
    Lookup(HashMap<String, String>),
    Custom(CorrectorFn),
}

impl Corrector {
    pub fn correct(
        &self,
        rule: &str,
        caps: &Captures<'_>,
        lexicon: &Lexicon,
    ) -> Result<Option<String>, RuleError> {
        match self {
            Corrector::Template(template) => {
                let mut out = String::new();
                caps.expand(template, &mut out);
                Ok(Some(out))
            }
            Corrector::Lookup(table) => {
                let matched = caps[0].to_lowercase();
                match table.get(&matched) {
                    Some(replacement) => Ok(Some(replacement.clone())),
                    None => Err(RuleError::MissingReplacement {
                        rule: rule.to_string(),
                        matched,
                    }),
                }
            }
            Corrector::Custom(f) => f(caps, lexicon),
        }
    }
}

pub struct Rule {
    pub id: String,
    pub kind: ErrorKind,
    pub pattern: Regex,
    pub explanation: String,
    pub corrector: Corrector,
    pub confidence: f32,
}

impl Rule {
    pub fn new(
        id: &str,
        kind: ErrorKind,
        pattern: &str,
        explanation: &str,
        corrector: Corrector,
        confidence: f32,
    ) -> Result<Self, RuleError> {
        let pattern = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            rule: id.to_string(),
            source,
        })?;
        Ok(Self {
            id: id.to_string(),
            kind,
            pattern,
            explanation: explanation.to_string(),
            corrector,
            confidence,
        })
    }
}

pub struct RulePass {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl RulePass {
    pub fn new(name: &str, rules: Vec<Rule>) -> Self {
        Self {
            name: name.to_string(),
            rules,
        }
    }
}

/// The six built-in passes, in the order they must run.
pub fn builtin_passes(lexicon: &Lexicon) -> Result<Vec<RulePass>, RuleError> {
    Ok(vec![
        RulePass::new("tenseMixing", tense_mixing()?),
        RulePass::new("agreement", agreement()?),
        RulePass::new("irregularVerbs", lookup_rules(
            "irregularMisspelling",
            ErrorKind::IrregularVerb,
            &lexicon.irregular_misspellings,
            "This verb is irregular; it does not take -ed in the past",
        )?),
        RulePass::new("gerundSuffix", gerund_suffix()?),
        RulePass::new("adverbOrder", adverb_order(lexicon)?),
        RulePass::new("misspellings", lookup_rules(
            "misspelling",
            ErrorKind::Misspelling,
            &lexicon.misspellings,
            "Check the spelling of this word",
        )?),
    ])
}

fn tense_mixing() -> Result<Vec<Rule>, RuleError> {
    Ok(vec![
        Rule::new(
            "pastAuxWithEd",
            ErrorKind::TenseMixing,
            r"(?i)\b(was|were)\s+([a-z]+ed)\b",
            "Past Continuous is was/were + verb-ing, not a past form",
            Corrector::Custom(aux_ed_to_continuous),
            0.7,
        )?,
        Rule::new(
            "presentAuxWithEd",
            ErrorKind::TenseMixing,
            r"(?i)\b(am|is|are)\s+([a-z]+ed)\b",
            "Past Simple does not need am/is/are before the verb",
            Corrector::Custom(drop_present_aux),
            0.9,
        )?,
    ])
}

fn agreement() -> Result<Vec<Rule>, RuleError> {
    Ok(vec![
        Rule::new(
            "singularWere",
            ErrorKind::AuxiliaryAgreement,
            r"(?i)\b(i|he|she|it)\s+were\b",
            "Use 'was' with I, he, she and it",
            Corrector::Template("$1 was".into()),
            0.95,
        )?,
        Rule::new(
            "pluralWas",
            ErrorKind::AuxiliaryAgreement,
            r"(?i)\b(you|we|they)\s+was\b",
            "Use 'were' with you, we and they",
            Corrector::Template("$1 were".into()),
            0.95,
        )?,
    ])
}

fn gerund_suffix() -> Result<Vec<Rule>, RuleError> {
    Ok(vec![
        Rule::new(
            "auxWithBaseVerb",
            ErrorKind::GerundSuffix,
            r"(?i)\b(was|were)\s+([a-z]+)\b",
            "After was/were the verb needs -ing",
            Corrector::Custom(base_to_gerund),
            0.9,
        )?,
        Rule::new(
            "doubledIng",
            ErrorKind::GerundSuffix,
            r"(?i)\b([a-z]+ing)ing\b",
            "The -ing ending is written only once",
            Corrector::Custom(drop_doubled_ing),
            0.95,
        )?,
    ])
}

fn adverb_order(lexicon: &Lexicon) -> Result<Vec<Rule>, RuleError> {
    let mut rules = Vec::new();
    if let Some(adverbs) = alternation(lexicon.frequency_adverbs.iter().map(String::as_str)) {
        rules.push(Rule::new(
            "adverbBeforeBe",
            ErrorKind::AdverbOrder,
            &format!(r"(?i)\b({})\s+(was|were)\b", adverbs),
            "Frequency adverbs go after was/were",
            Corrector::Template("$2 $1".into()),
            0.9,
        )?);
    }
    let determiners = alternation(lexicon.determiners.iter().map(String::as_str)).unwrap_or_default();
    rules.push(Rule::new(
        "timeBeforeObject",
        ErrorKind::AdverbOrder,
        &format!(r"(?i)\b([a-z']+)\s+(yesterday|today|tonight)\s+((?:(?:{})\s+)?[a-z']+)\b", determiners),
        "Put the object right after the verb and the time at the end",
        Corrector::Custom(move_time_after_object),
        0.75,
    )?);
    Ok(rules)
}

fn lookup_rules(
    id: &str,
    kind: ErrorKind,
    entries: &[Misspelling],
    explanation: &str,
) -> Result<Vec<Rule>, RuleError> {
    let Some(words) = alternation(entries.iter().map(|m| m.wrong.as_str())) else {
        return Ok(Vec::new());
    };
    let table = entries
        .iter()
        .map(|m| (m.wrong.to_lowercase(), m.right.clone()))
        .collect();
    Ok(vec![Rule::new(
        id,
        kind,
        &format!(r"(?i)\b({})\b", words),
        explanation,
        Corrector::Lookup(table),
        0.95,
    )?])
}

/// `a|b|c` with regex metacharacters escaped; `None` for an empty list.
fn alternation<'a>(words: impl Iterator<Item = &'a str>) -> Option<String> {
    let escaped: Vec<String> = words.map(regex::escape).collect();
    (!escaped.is_empty()).then(|| escaped.join("|"))
}

fn known_ed_verb(lexicon: &Lexicon, word: &str) -> Option<String> {
    let lower = word.to_lowercase();
    if lexicon.is_ed_exclusion(&lower) {
        return None;
    }
    lemmatize(lexicon, &lower)
}

fn aux_ed_to_continuous(caps: &Captures<'_>, lexicon: &Lexicon) -> Result<Option<String>, RuleError> {
    if known_ed_verb(lexicon, &caps[2]).is_none() {
        return Ok(None);
    }
    let base = base_from_ed(lexicon, &caps[2].to_lowercase());
    Ok(Some(format!("{} {}", &caps[1], gerund(&base))))
}

fn drop_present_aux(caps: &Captures<'_>, lexicon: &Lexicon) -> Result<Option<String>, RuleError> {
    Ok(known_ed_verb(lexicon, &caps[2]).map(|_| caps[2].to_string()))
}

fn base_to_gerund(caps: &Captures<'_>, lexicon: &Lexicon) -> Result<Option<String>, RuleError> {
    let verb = caps[2].to_lowercase();
    if !lexicon.is_base_verb(&verb) || verb.ends_with("ing") {
        return Ok(None);
    }
    Ok(Some(format!("{} {}", &caps[1], gerund(&verb))))
}

/// "writinging" but not "bringing" or "singing".
fn drop_doubled_ing(caps: &Captures<'_>, lexicon: &Lexicon) -> Result<Option<String>, RuleError> {
    let whole = caps[0].to_lowercase();
    let single = caps[1].to_lowercase();
    if lemmatize(lexicon, &whole).is_some() || lemmatize(lexicon, &single).is_none() {
        return Ok(None);
    }
    Ok(Some(caps[1].to_string()))
}

/// "played yesterday football" -> "played football yesterday". The object
/// must end in a word the lexicon doesn't know (not a preposition, article or
/// time word), so "arrived yesterday at noon" is left alone.
fn move_time_after_object(caps: &Captures<'_>, lexicon: &Lexicon) -> Result<Option<String>, RuleError> {
    let verb = caps[1].to_lowercase();
    let object = caps[3].to_lowercase();
    let Some(head) = object.split_whitespace().last() else {
        return Ok(None);
    };

    let is_past = lexicon.irregular_by_past(&verb).is_some() || known_ed_verb(lexicon, &verb).is_some();
    let is_object = !matches!(head, "and" | "but" | "or" | "because" | "so") && !lexicon.knows(head);

    if !(is_past && is_object) {
        return Ok(None);
    }
    Ok(Some(format!("{} {} {}", &caps[1], &caps[3], &caps[2])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_ids(passes: &[RulePass]) -> Vec<(&str, Vec<&str>)> {
        passes
            .iter()
            .map(|p| (p.name.as_str(), p.rules.iter().map(|r| r.id.as_str()).collect()))
            .collect()
    }

    #[test]
    fn test_builtin_pass_order() {
        let lexicon = Lexicon::builtin();
        let passes = builtin_passes(&lexicon).unwrap();
        let ids = rule_ids(&passes);

        let names: Vec<&str> = ids.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["tenseMixing", "agreement", "irregularVerbs", "gerundSuffix", "adverbOrder", "misspellings"]
        );
        assert_eq!(ids[4].1, vec!["adverbBeforeBe", "timeBeforeObject"]);
    }

    #[test]
    fn test_empty_tables_produce_no_rules() {
        let mut lexicon = Lexicon::builtin();
        lexicon.misspellings.clear();
        lexicon.frequency_adverbs.clear();

        let passes = builtin_passes(&lexicon).unwrap();
        assert!(passes[5].rules.is_empty());
        assert_eq!(passes[4].rules.len(), 1);
    }

    #[test]
    fn test_lookup_escapes_metacharacters() {
        let entries = vec![Misspelling { wrong: "c.t".into(), right: "cat".into() }];
        let rules = lookup_rules("x", ErrorKind::Misspelling, &entries, "").unwrap();
        assert!(rules[0].pattern.is_match("a c.t sat"));
        assert!(!rules[0].pattern.is_match("a cut sat"));
    }

    #[test]
    fn test_custom_correctors() {
        let lexicon = Lexicon::builtin();
        let rule = &tense_mixing().unwrap()[0];

        let caps = rule.pattern.captures("I was walked").unwrap();
        let fixed = rule.corrector.correct(&rule.id, &caps, &lexicon).unwrap();
        assert_eq!(fixed.as_deref(), Some("was walking"));

        // Adjectives ending in -ed are left alone
        let caps = rule.pattern.captures("I was tired").unwrap();
        assert_eq!(rule.corrector.correct(&rule.id, &caps, &lexicon).unwrap(), None);
    }

    #[test]
    fn test_doubled_ing_spares_real_verbs() {
        let lexicon = Lexicon::builtin();
        let rule = &gerund_suffix().unwrap()[1];

        let caps = rule.pattern.captures("writinging").unwrap();
        let fixed = rule.corrector.correct(&rule.id, &caps, &lexicon).unwrap();
        assert_eq!(fixed.as_deref(), Some("writing"));

        let caps = rule.pattern.captures("bringing").unwrap();
        assert_eq!(rule.corrector.correct(&rule.id, &caps, &lexicon).unwrap(), None);
    }

    #[test]
    fn test_time_before_object_needs_a_noun() {
        let lexicon = Lexicon::builtin();
        let rule = &adverb_order(&lexicon).unwrap()[1];
        let correct = |text: &str| {
            let caps = rule.pattern.captures(text).unwrap();
            rule.corrector.correct(&rule.id, &caps, &lexicon).unwrap()
        };

        assert_eq!(correct("I bought yesterday a car").as_deref(), Some("bought a car yesterday"));
        assert_eq!(correct("I arrived yesterday at noon"), None);
        assert_eq!(correct("She called today the"), None);
        assert_eq!(correct("We left yesterday morning"), None);
    }

    #[test]
    fn test_lookup_miss_is_an_error() {
        let lexicon = Lexicon::builtin();
        let rule = Rule::new(
            "broken",
            ErrorKind::Misspelling,
            r"\bteh\b",
            "",
            Corrector::Lookup(HashMap::new()),
            0.95,
        )
        .unwrap();
        let caps = rule.pattern.captures("teh cat").unwrap();
        let err = rule.corrector.correct(&rule.id, &caps, &lexicon).unwrap_err();
        assert!(matches!(err, RuleError::MissingReplacement { .. }));
    }

    #[test]
    fn test_invalid_pattern_names_rule() {
        let err = Rule::new("bad", ErrorKind::Misspelling, "(", "", Corrector::Template(String::new()), 1.0)
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("rule 'bad' has an invalid pattern"));
    }
}
