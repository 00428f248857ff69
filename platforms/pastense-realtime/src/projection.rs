//! The UI-facing shape of one analysis.

use pastense_detector::DetectionReport;
use pastense_parser::StructureResult;
use pastense_protocol::{
    AnalysisTier, DetectedError, ErrorKind, Recommendation, RecommendationResult, Role, RoleFlags, TenseType,
};
use serde::{Deserialize, Serialize};

/// Which parts of the projection a caller wants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzeOptions {
    /// Overrides the size-based tier
    pub level: Option<AnalysisTier>,
    pub icons_only: bool,
    pub suggestions_only: bool,
    pub max_suggestions: Option<usize>,
    pub structure_only: bool,
}

impl AnalyzeOptions {
    pub fn cache_key(&self, text: &str) -> String {
        format!(
            "{}\u{1f}{:?}|{}|{}|{:?}|{}",
            text, self.level, self.icons_only, self.suggestions_only, self.max_suggestions, self.structure_only
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconState {
    Active,
    Error,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icons {
    pub subject: IconState,
    pub auxiliary: IconState,
    pub verb: IconState,
    pub gerund: IconState,
    pub complement: IconState,
    pub connector: IconState,
}

impl Icons {
    pub fn from_analysis(structure: &StructureResult, detection: Option<&DetectionReport>) -> Self {
        let state = |role: Role| match structure.role(role) {
            Some(detail) if detail.valid => IconState::Active,
            Some(_) => IconState::Error,
            None => IconState::Missing,
        };
        let mut icons = Self {
            subject: state(Role::Subject),
            auxiliary: state(Role::Auxiliary),
            verb: state(Role::MainVerb),
            gerund: state(Role::Gerund),
            complement: state(Role::Complement),
            connector: state(Role::Connector),
        };

        // Detector findings flag the icon they belong to
        for error in detection.map(|d| d.errors.as_slice()).unwrap_or_default() {
            let slot = match error.kind {
                ErrorKind::AuxiliaryAgreement => &mut icons.auxiliary,
                ErrorKind::GerundSuffix => &mut icons.gerund,
                ErrorKind::IrregularVerb | ErrorKind::TenseMixing => &mut icons.verb,
                _ => continue,
            };
            if *slot == IconState::Active {
                *slot = IconState::Error;
            }
        }
        icons
    }

    pub fn state(&self, role: Role) -> Option<IconState> {
        match role {
            Role::Subject => Some(self.subject),
            Role::Auxiliary => Some(self.auxiliary),
            Role::MainVerb => Some(self.verb),
            Role::Gerund => Some(self.gerund),
            Role::Complement => Some(self.complement),
            Role::Connector => Some(self.connector),
            Role::TimeMarker => None,
        }
    }

    /// Required roles whose icon is active.
    pub fn satisfied(&self) -> RoleFlags {
        Role::DETECTION_ORDER
            .into_iter()
            .filter(|role| self.state(*role) == Some(IconState::Active))
            .fold(RoleFlags::empty(), |acc, role| acc | role.flag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    Error,
    Recommendation,
    Tip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Stable key for the phrasebook (an error kind id, `recommend.*` or `tip.*`)
    pub key: String,
    pub kind: SuggestionKind,
    pub message: String,
    pub replacement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub is_empty: bool,
    pub is_incremental: bool,
    /// A pipeline stage failed and this is a fallback
    pub degraded: bool,
    pub tier: AnalysisTier,
    pub word_count: usize,
    pub tense: TenseType,
    pub completion: u8,
    pub icons: Option<Icons>,
    pub suggestions: Vec<Suggestion>,
    pub recommendation: Option<Recommendation>,
    pub confidence: f32,
    pub error_keys: Vec<String>,
    pub corrected_sentence: Option<String>,
}

impl Projection {
    /// The answer for rejected input.
    pub fn empty() -> Self {
        Self {
            is_empty: true,
            is_incremental: false,
            degraded: false,
            tier: AnalysisTier::None,
            word_count: 0,
            tense: TenseType::Unknown,
            completion: 0,
            icons: None,
            suggestions: Vec::new(),
            recommendation: None,
            confidence: 0.0,
            error_keys: Vec::new(),
            corrected_sentence: None,
        }
    }

    pub fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::empty()
        }
    }
}

/// Outputs of the stages that ran for one request.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub structure: StructureResult,
    pub detection: Option<DetectionReport>,
    pub recommendation: Option<RecommendationResult>,
}

pub fn project(
    analysis: &Analysis,
    tier: AnalysisTier,
    word_count: usize,
    options: &AnalyzeOptions,
    max_suggestions: usize,
) -> Projection {
    let structure = &analysis.structure;
    let detection = analysis.detection.as_ref();

    let mut errors: Vec<&DetectedError> = structure.errors.iter().collect();
    errors.extend(detection.into_iter().flat_map(|d| d.errors.iter()));
    errors.sort_by_key(|e| (e.severity, e.position));

    let mut error_keys: Vec<String> = Vec::new();
    for error in &errors {
        let key = error.kind.id().to_string();
        if !error_keys.contains(&key) {
            error_keys.push(key);
        }
    }

    let recommendation = if options.icons_only { None } else { analysis.recommendation.as_ref() };

    let suggestions = if options.icons_only {
        Vec::new()
    } else {
        let limit = options.max_suggestions.unwrap_or(max_suggestions).min(max_suggestions);
        build_suggestions(&errors, recommendation, structure.missing_roles, limit)
    };

    // Completion follows the icons so an incremental update can recompute it
    let icons = Icons::from_analysis(structure, detection);
    let completion = structure.tense_type.completion(icons.satisfied());

    let corrected_sentence = detection
        .filter(|d| d.corrected != d.original)
        .map(|d| d.corrected.clone());

    Projection {
        is_empty: false,
        is_incremental: false,
        degraded: false,
        tier,
        word_count,
        tense: structure.tense_type,
        completion,
        icons: (!options.suggestions_only).then_some(icons),
        suggestions,
        recommendation: recommendation.map(|r| r.primary),
        confidence: recommendation.map(|r| r.confidence).unwrap_or(0.0),
        error_keys,
        corrected_sentence,
    }
}

/// Errors first (already ranked), then one recommendation, then tips.
fn build_suggestions(
    errors: &[&DetectedError],
    recommendation: Option<&RecommendationResult>,
    missing: RoleFlags,
    limit: usize,
) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::new();
    let mut push = |suggestion: Suggestion| {
        if !out.iter().any(|s| s.key == suggestion.key) {
            out.push(suggestion);
        }
    };

    for error in errors {
        let message = match &error.suggestion {
            Some(fix) if !error.matched.is_empty() => format!("{} ('{}' → '{}')", error.message, error.matched, fix),
            _ => error.message.clone(),
        };
        push(Suggestion {
            key: error.kind.id().to_string(),
            kind: SuggestionKind::Error,
            message,
            replacement: error.suggestion.clone(),
        });
    }

    if let Some(rec) = recommendation.filter(|r| r.primary != Recommendation::Either) {
        let message = match rec.strongest_factor() {
            Some(factor) => format!("'{}' points to {}", factor.evidence, tense_label(rec.primary)),
            None => format!("This context points to {}", tense_label(rec.primary)),
        };
        push(Suggestion {
            key: format!("recommend.{}", rec.primary.id()),
            kind: SuggestionKind::Recommendation,
            message,
            replacement: None,
        });
    }

    for role in missing.roles() {
        push(Suggestion {
            key: format!("tip.{}", role.name()),
            kind: SuggestionKind::Tip,
            message: tip(role).to_string(),
            replacement: None,
        });
    }

    out.truncate(limit);
    out
}

fn tense_label(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::PastSimple => "the Past Simple",
        Recommendation::PastContinuous => "the Past Continuous",
        Recommendation::Mixed => "both tenses: Past Continuous for the background, Past Simple for the event",
        Recommendation::Either => "either tense",
    }
}

fn tip(role: Role) -> &'static str {
    match role {
        Role::Subject => "Start with who did it: I, she, they, my friend...",
        Role::Auxiliary => "Add was or were before the -ing verb",
        Role::MainVerb => "Add a verb in the past: walked, went, saw...",
        Role::Gerund => "Add a verb ending in -ing after was/were",
        Role::Complement => "Say where, what or with whom",
        Role::Connector => "Join the actions with while, when or as",
        Role::TimeMarker => "Say when it happened: yesterday, last night...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastense_parser::StructureAnalyzer;
    use pastense_protocol::Lexicon;

    fn analysis(sentence: &str) -> Analysis {
        let lexicon = Lexicon::builtin();
        Analysis {
            structure: StructureAnalyzer::new(&lexicon).analyze(sentence),
            detection: None,
            recommendation: None,
        }
    }

    #[test]
    fn test_icons_follow_roles() {
        let a = analysis("I am studying");
        let icons = Icons::from_analysis(&a.structure, None);
        assert_eq!(icons.subject, IconState::Active);
        assert_eq!(icons.auxiliary, IconState::Error);
        assert_eq!(icons.gerund, IconState::Active);
        assert_eq!(icons.verb, IconState::Missing);
        assert_eq!(icons.satisfied(), RoleFlags::SUBJECT | RoleFlags::GERUND);
    }

    #[test]
    fn test_suggestions_ranked_and_capped() {
        // missingSubject (critical) before baseVerbInPast (critical, later position)
        let a = analysis("yesterday go to school");
        let projection = project(&a, AnalysisTier::Basic, 5, &AnalyzeOptions::default(), 3);

        assert!(projection.suggestions.len() <= 3);
        assert_eq!(projection.suggestions[0].key, "missingSubject");
        assert_eq!(projection.suggestions[1].key, "baseVerbInPast");
        assert_eq!(projection.suggestions[1].replacement.as_deref(), Some("went"));
        assert_eq!(projection.suggestions[2].kind, SuggestionKind::Tip);
    }

    #[test]
    fn test_options_trim_output() {
        let a = analysis("I am studying");

        let icons_only = AnalyzeOptions { icons_only: true, ..AnalyzeOptions::default() };
        let p = project(&a, AnalysisTier::Basic, 3, &icons_only, 3);
        assert!(p.suggestions.is_empty());
        assert!(p.icons.is_some());

        let suggestions_only = AnalyzeOptions { suggestions_only: true, ..AnalyzeOptions::default() };
        let p = project(&a, AnalysisTier::Basic, 3, &suggestions_only, 3);
        assert!(p.icons.is_none());
        assert!(!p.suggestions.is_empty());

        let one = AnalyzeOptions { max_suggestions: Some(1), ..AnalyzeOptions::default() };
        assert_eq!(project(&a, AnalysisTier::Basic, 3, &one, 3).suggestions.len(), 1);

        // The caller cannot raise the configured cap
        let many = AnalyzeOptions { max_suggestions: Some(10), ..AnalyzeOptions::default() };
        assert!(project(&a, AnalysisTier::Basic, 3, &many, 2).suggestions.len() <= 2);
    }

    #[test]
    fn test_empty_projection() {
        let p = Projection::empty();
        assert!(p.is_empty);
        assert_eq!(p.completion, 0);
        assert!(p.suggestions.is_empty());
        assert!(!p.degraded);
        assert!(Projection::degraded().degraded);
    }
}
