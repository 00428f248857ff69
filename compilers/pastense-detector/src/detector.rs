use std::sync::Arc;

use pastense_protocol::{Correction, DetectedError, Lexicon};
use serde::{Deserialize, Serialize};

use crate::apply::{apply_corrections, match_case};
use crate::error::RuleError;
use crate::rules::{builtin_passes, RulePass};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Corrections below this confidence are reported but not applied.
    pub auto_apply_threshold: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            auto_apply_threshold: 0.9,
        }
    }
}

/// A pass that stopped early because one of its correctors failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassFailure {
    pub pass: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub original: String,
    pub corrected: String,
    pub errors: Vec<DetectedError>,
    pub corrections: Vec<Correction>,
    pub failed_passes: Vec<PassFailure>,
}

impl DetectionReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.failed_passes.is_empty()
    }
}

struct Finding {
    error: DetectedError,
    correction: Correction,
}

pub struct ErrorDetector {
    lexicon: Arc<Lexicon>,
    passes: Vec<RulePass>,
    config: DetectorConfig,
}

impl ErrorDetector {
    pub fn new(lexicon: Arc<Lexicon>, config: DetectorConfig) -> Result<Self, RuleError> {
        let passes = builtin_passes(&lexicon)?;
        Ok(Self::with_passes(lexicon, passes, config))
    }

    pub fn with_passes(lexicon: Arc<Lexicon>, passes: Vec<RulePass>, config: DetectorConfig) -> Self {
        Self {
            lexicon,
            passes,
            config,
        }
    }

    pub fn passes(&self) -> impl Iterator<Item = &str> {
        self.passes.iter().map(|p| p.name.as_str())
    }

    /// Run every pass over one snapshot of `sentence`, then apply the
    /// high-confidence corrections.
    ///
    /// All offsets refer to `sentence`; nothing is rewritten mid-pass.
    pub fn detect_all(&self, sentence: &str) -> DetectionReport {
        let mut errors = Vec::new();
        let mut corrections = Vec::new();
        let mut failed_passes = Vec::new();
        let mut claimed: Vec<(usize, usize)> = Vec::new();

        for pass in &self.passes {
            let findings = match self.run_pass(pass, sentence, &claimed) {
                Ok(findings) => {
                    tracing::debug!(pass = %pass.name, found = findings.len(), "detector pass");
                    findings
                }
                Err((partial, e)) => {
                    tracing::warn!(pass = %pass.name, kept = partial.len(), error = %e, "detector pass failed");
                    failed_passes.push(PassFailure {
                        pass: pass.name.clone(),
                        reason: e.to_string(),
                    });
                    partial
                }
            };
            for finding in findings {
                claimed.push((finding.correction.position, finding.correction.end()));
                errors.push(finding.error);
                corrections.push(finding.correction);
            }
        }

        let corrected = apply_corrections(sentence, &mut corrections, self.config.auto_apply_threshold);

        DetectionReport {
            original: sentence.to_string(),
            corrected,
            errors,
            corrections,
            failed_passes,
        }
    }

    fn run_pass(
        &self,
        pass: &RulePass,
        sentence: &str,
        claimed: &[(usize, usize)],
    ) -> Result<Vec<Finding>, (Vec<Finding>, RuleError)> {
        let mut findings = Vec::new();

        for rule in &pass.rules {
            for caps in rule.pattern.captures_iter(sentence) {
                let Some(m) = caps.get(0) else { continue };
                // Already handled by an earlier pass
                if claimed.iter().any(|&(s, e)| s <= m.start() && m.end() <= e) {
                    continue;
                }
                let replacement = match rule.corrector.correct(&rule.id, &caps, &self.lexicon) {
                    Ok(Some(replacement)) => replacement,
                    Ok(None) => continue,
                    Err(e) => return Err((findings, e)),
                };
                let replacement = match_case(m.as_str(), &replacement);
                if replacement == m.as_str() {
                    continue;
                }

                let error = DetectedError::new(
                    rule.kind,
                    rule.explanation.clone(),
                    m.as_str().to_string(),
                    m.start(),
                )
                .with_suggestion(replacement.clone(), rule.confidence);

                findings.push(Finding {
                    error,
                    correction: Correction {
                        kind: rule.kind,
                        original: m.as_str().to_string(),
                        replacement,
                        position: m.start(),
                        confidence: rule.confidence,
                        applied: false,
                    },
                });
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Corrector, Rule};
    use pastense_protocol::ErrorKind;
    use regex::Captures;

    fn detector() -> ErrorDetector {
        ErrorDetector::new(Arc::new(Lexicon::builtin()), DetectorConfig::default()).unwrap()
    }

    fn kinds(report: &DetectionReport) -> Vec<ErrorKind> {
        report.errors.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_correct_sentence_is_untouched() {
        let report = detector().detect_all("Yesterday I went to school");
        assert!(report.errors.is_empty());
        assert!(report.corrections.is_empty());
        assert_eq!(report.corrected, report.original);
        assert!(report.is_clean());
    }

    #[test]
    fn test_irregular_round_trip() {
        let detector = detector();
        let report = detector.detect_all("I goed home");

        assert_eq!(kinds(&report), vec![ErrorKind::IrregularVerb]);
        assert_eq!(report.corrected, "I went home");

        let again = detector.detect_all(&report.corrected);
        assert!(again.errors.is_empty());
    }

    #[test]
    fn test_capital_is_preserved() {
        let report = detector().detect_all("Goed he home?");
        assert_eq!(report.corrected, "Went he home?");
    }

    #[test]
    fn test_agreement() {
        let detector = detector();
        assert_eq!(detector.detect_all("They was playing").corrected, "They were playing");
        assert_eq!(detector.detect_all("She were sleeping").corrected, "She was sleeping");
    }

    #[test]
    fn test_overlap_converges_over_two_cycles() {
        let detector = detector();

        let first = detector.detect_all("I were walk");
        assert_eq!(
            kinds(&first),
            vec![ErrorKind::AuxiliaryAgreement, ErrorKind::GerundSuffix]
        );
        assert_eq!(first.corrected, "I were walking");

        let second = detector.detect_all(&first.corrected);
        assert_eq!(second.corrected, "I was walking");

        let third = detector.detect_all(&second.corrected);
        assert!(third.errors.is_empty());
    }

    #[test]
    fn test_low_confidence_reported_only() {
        let report = detector().detect_all("I was walked to school");
        assert_eq!(kinds(&report), vec![ErrorKind::TenseMixing]);
        assert_eq!(report.errors[0].suggestion.as_deref(), Some("was walking"));
        assert_eq!(report.corrected, report.original);
        assert!(!report.corrections[0].applied);
    }

    #[test]
    fn test_present_aux_dropped() {
        let report = detector().detect_all("Yesterday I am walked home");
        assert_eq!(report.corrected, "Yesterday I walked home");
    }

    #[test]
    fn test_adverb_order() {
        let detector = detector();
        assert_eq!(detector.detect_all("He always was late").corrected, "He was always late");

        let report = detector.detect_all("I played yesterday football");
        assert_eq!(kinds(&report), vec![ErrorKind::AdverbOrder]);
        assert_eq!(report.errors[0].suggestion.as_deref(), Some("played football yesterday"));
        // 0.75 stays below the auto-apply threshold
        assert_eq!(report.corrected, report.original);

        assert!(detector.detect_all("I arrived yesterday at noon").errors.is_empty());
    }

    #[test]
    fn test_doubled_ing_and_misspelling() {
        let report = detector().detect_all("She was writinging and studing");
        assert_eq!(report.corrected, "She was writing and studying");
    }

    #[test]
    fn test_later_pass_inside_claimed_span_is_dropped() {
        // "comed" is both an irregular misspelling and, inside "were comed",
        // a tense-mixing candidate; the tense-mixing span claims it first.
        let lexicon = Arc::new(Lexicon::builtin());
        let outer = Rule::new(
            "outer",
            ErrorKind::TenseMixing,
            r"\bwere comed\b",
            "",
            Corrector::Template("were coming".into()),
            0.95,
        )
        .unwrap();
        let inner = Rule::new(
            "inner",
            ErrorKind::IrregularVerb,
            r"\bcomed\b",
            "",
            Corrector::Template("came".into()),
            0.95,
        )
        .unwrap();
        let detector = ErrorDetector::with_passes(
            lexicon,
            vec![RulePass::new("first", vec![outer]), RulePass::new("second", vec![inner])],
            DetectorConfig::default(),
        );

        let report = detector.detect_all("they were comed");
        assert_eq!(kinds(&report), vec![ErrorKind::TenseMixing]);
        assert_eq!(report.corrected, "they were coming");
    }

    fn always_fails(_: &Captures<'_>, _: &Lexicon) -> Result<Option<String>, RuleError> {
        Err(RuleError::Corrector {
            rule: "boom".into(),
            reason: "corrupt table".into(),
        })
    }

    #[test]
    fn test_failing_pass_keeps_partial_results() {
        let lexicon = Arc::new(Lexicon::builtin());
        let mut passes = builtin_passes(&lexicon).unwrap();
        let broken = Rule::new("boom", ErrorKind::AdverbOrder, r"\bhome\b", "", Corrector::Custom(always_fails), 0.9)
            .unwrap();
        passes.insert(3, RulePass::new("broken", vec![broken]));
        let detector = ErrorDetector::with_passes(lexicon, passes, DetectorConfig::default());

        let report = detector.detect_all("I goed home and studing");

        assert_eq!(report.failed_passes.len(), 1);
        assert_eq!(report.failed_passes[0].pass, "broken");
        assert!(report.failed_passes[0].reason.contains("corrupt table"));
        // Passes before and after the broken one still report
        assert_eq!(kinds(&report), vec![ErrorKind::IrregularVerb, ErrorKind::Misspelling]);
        assert_eq!(report.corrected, "I went home and studying");
        assert!(!report.is_clean());
    }

    #[test]
    fn test_failing_rule_keeps_earlier_findings_of_its_pass() {
        let lexicon = Arc::new(Lexicon::builtin());
        let fixed = Rule::new("goed", ErrorKind::IrregularVerb, r"\bgoed\b", "", Corrector::Template("went".into()), 0.95)
            .unwrap();
        let broken = Rule::new("boom", ErrorKind::AdverbOrder, r"\bhome\b", "", Corrector::Custom(always_fails), 0.9)
            .unwrap();
        let detector = ErrorDetector::with_passes(
            lexicon,
            vec![RulePass::new("mixed", vec![fixed, broken])],
            DetectorConfig::default(),
        );

        let report = detector.detect_all("I goed home");

        assert_eq!(report.failed_passes.len(), 1);
        assert_eq!(report.failed_passes[0].pass, "mixed");
        assert_eq!(kinds(&report), vec![ErrorKind::IrregularVerb]);
        assert_eq!(report.corrected, "I went home");
    }

    #[test]
    fn test_threshold_is_configurable() {
        let detector = ErrorDetector::new(
            Arc::new(Lexicon::builtin()),
            DetectorConfig { auto_apply_threshold: 0.7 },
        )
        .unwrap();
        assert_eq!(detector.detect_all("I was walked").corrected, "I was walking");
    }

    #[test]
    fn test_empty_sentence() {
        let report = detector().detect_all("");
        assert!(report.errors.is_empty());
        assert_eq!(report.corrected, "");
    }
}
