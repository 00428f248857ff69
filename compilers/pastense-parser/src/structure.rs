use pastense_morph::{lemmatize, noun_number, past_be, past_form};
use pastense_protocol::{
    AuxiliaryClass, DetectedError, ErrorKind, Lexicon, Number, Person, Role, RoleFlags, TenseType,
};
use serde::Serialize;

use crate::token::Token;
use crate::Lexer;

/// What kind of filler occupies a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleSubtype {
    Pronoun,
    NounPhrase,
    ProperNoun,
    PastAuxiliary,
    PresentAuxiliary,
    /// wasn't / weren't
    NegativeContinuous,
    /// didn't
    NegativeSimple,
    IrregularPast,
    RegularPast,
    /// Base form licensed by didn't
    BaseAfterNegative,
    BaseForm,
    Gerund,
    Complement,
    Connector,
    TimeMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDetail {
    pub role: Role,
    pub text: String,
    pub subtype: RoleSubtype,
    pub valid: bool,
    pub error: Option<DetectedError>,
    pub token_indices: Vec<usize>,
}

impl RoleDetail {
    fn valid(role: Role, subtype: RoleSubtype, tokens: &[Token], indices: Vec<usize>) -> Self {
        Self {
            role,
            text: join_original(tokens, &indices),
            subtype,
            valid: true,
            error: None,
            token_indices: indices,
        }
    }

    fn invalid(mut self, error: DetectedError) -> Self {
        self.valid = false;
        self.error = Some(error);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureResult {
    pub tokens: Vec<Token>,
    pub roles: Vec<RoleDetail>,
    pub tense_type: TenseType,
    pub is_valid: bool,
    pub errors: Vec<DetectedError>,
    pub completed_roles: RoleFlags,
    pub missing_roles: RoleFlags,
    pub completion: u8,
}

impl StructureResult {
    pub fn empty() -> Self {
        Self {
            tokens: Vec::new(),
            roles: Vec::new(),
            tense_type: TenseType::Unknown,
            is_valid: false,
            errors: Vec::new(),
            completed_roles: RoleFlags::empty(),
            missing_roles: RoleFlags::empty(),
            completion: 0,
        }
    }

    /// First detail recorded for a role (the primary slot).
    pub fn role(&self, role: Role) -> Option<&RoleDetail> {
        self.roles.iter().find(|r| r.role == role)
    }

    /// Roles detected at all, valid or not.
    pub fn detected_roles(&self) -> RoleFlags {
        self.roles
            .iter()
            .fold(RoleFlags::empty(), |acc, r| acc | r.role.flag())
    }

    pub fn completed_role_names(&self) -> Vec<&'static str> {
        self.completed_roles.names()
    }

    pub fn missing_role_names(&self) -> Vec<&'static str> {
        self.missing_roles.names()
    }

    pub fn has_continuous_shape(&self) -> bool {
        let aux_ok = self
            .role(Role::Auxiliary)
            .is_some_and(|a| matches!(a.subtype, RoleSubtype::PastAuxiliary | RoleSubtype::NegativeContinuous));
        aux_ok && self.role(Role::Gerund).is_some()
    }
}

struct SubjectMatch {
    indices: Vec<usize>,
    subtype: RoleSubtype,
    person: Person,
    number: Number,
}

/// Rule-based role classifier for past-tense sentences.
///
/// Handles:
/// - Subject: pronoun, determiner + noun, capitalized proper noun
/// - Auxiliary: was/were, am/is/are (error), wasn't/weren't/didn't
/// - Main verb: irregular past, regular -ed, base form (error unless after didn't)
/// - Gerund, complement, connectors and time markers
pub struct StructureAnalyzer<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> StructureAnalyzer<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn analyze(&self, sentence: &str) -> StructureResult {
        let mut tokens = Lexer::new().tokenize(sentence);
        if tokens.is_empty() {
            return StructureResult::empty();
        }

        // Closed-class words that only the last two detectors may claim
        let marker_spans = self.time_marker_spans(&tokens);
        let reserved: Vec<bool> = tokens
            .iter()
            .map(|t| {
                self.lexicon.connector(&t.text).is_some()
                    || marker_spans.iter().any(|span| span.contains(&t.index))
            })
            .collect();

        let mut roles = Vec::new();

        // 1. Subject
        let subject = self.find_subject(&tokens, &reserved);
        if let Some(found) = &subject {
            claim(&mut tokens, &found.indices, Role::Subject);
            roles.push(RoleDetail::valid(Role::Subject, found.subtype, &tokens, found.indices.clone()));
        }

        // 2. Auxiliary
        if let Some(aux) = self.find_auxiliary(&tokens, subject.as_ref()) {
            claim(&mut tokens, &aux.token_indices, Role::Auxiliary);
            roles.push(aux);
        }
        let aux_subtype = roles.iter().find(|r| r.role == Role::Auxiliary).map(|r| r.subtype);

        // 3. Main verb
        if let Some(verb) = self.find_main_verb(&tokens, aux_subtype) {
            claim(&mut tokens, &verb.token_indices, Role::MainVerb);
            roles.push(verb);
        }

        // 4. Gerund
        if let Some(index) = tokens.iter().position(|t| !t.consumed && self.is_gerund(t)) {
            claim(&mut tokens, &[index], Role::Gerund);
            roles.push(RoleDetail::valid(Role::Gerund, RoleSubtype::Gerund, &tokens, vec![index]));
        }

        // 5. Complement: whatever is left, minus connector and marker words
        let rest: Vec<usize> = tokens
            .iter()
            .filter(|t| !t.consumed && !reserved[t.index])
            .map(|t| t.index)
            .collect();
        if !rest.is_empty() {
            claim(&mut tokens, &rest, Role::Complement);
            roles.push(RoleDetail::valid(Role::Complement, RoleSubtype::Complement, &tokens, rest));
        }

        // 6. Connectors, except inside a time-marker phrase ("the day before yesterday")
        let in_marker = |index: usize| marker_spans.iter().any(|span| span.contains(&index));
        let connectors: Vec<usize> = tokens
            .iter()
            .filter(|t| !t.consumed && !in_marker(t.index) && self.lexicon.connector(&t.text).is_some())
            .map(|t| t.index)
            .collect();
        for index in connectors {
            claim(&mut tokens, &[index], Role::Connector);
            roles.push(RoleDetail::valid(Role::Connector, RoleSubtype::Connector, &tokens, vec![index]));
        }

        // 7. Time markers
        for span in marker_spans {
            if span.iter().all(|&i| !tokens[i].consumed) {
                claim(&mut tokens, &span, Role::TimeMarker);
                roles.push(RoleDetail::valid(Role::TimeMarker, RoleSubtype::TimeMarker, &tokens, span));
            }
        }

        let tense_type = determine_tense(&roles);
        let mut errors: Vec<DetectedError> = roles.iter().filter_map(|r| r.error.clone()).collect();
        errors.extend(validate(&roles, tense_type));

        let completed_roles = roles
            .iter()
            .filter(|r| r.valid)
            .fold(RoleFlags::empty(), |acc, r| acc | r.role.flag());
        let missing_roles = tense_type.required_roles() - completed_roles;
        let completion = tense_type.completion(completed_roles);

        tracing::debug!(
            tense = tense_type.id(),
            completion,
            errors = errors.len(),
            "structure analyzed"
        );

        StructureResult {
            tokens,
            roles,
            tense_type,
            is_valid: errors.is_empty(),
            errors,
            completed_roles,
            missing_roles,
            completion,
        }
    }

    /// Token index runs covered by time-marker phrases, longest phrase first.
    fn time_marker_spans(&self, tokens: &[Token]) -> Vec<Vec<usize>> {
        let phrases = self.lexicon.time_marker_phrases();
        let mut spans = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let matched = phrases.iter().find_map(|(words, _)| {
                let end = i + words.len();
                let hit = end <= tokens.len()
                    && tokens[i..end].iter().zip(words).all(|(t, w)| t.text == *w);
                hit.then_some(end)
            });
            match matched {
                Some(end) => {
                    spans.push((i..end).collect());
                    i = end;
                }
                None => i += 1,
            }
        }
        spans
    }

    /// Personal pronoun anywhere, then determiner + noun, then proper noun.
    fn find_subject(&self, tokens: &[Token], reserved: &[bool]) -> Option<SubjectMatch> {
        let open = |i: usize| !reserved[i];

        let pronoun = tokens.iter().enumerate().filter(|(i, _)| open(*i)).find_map(|(i, token)| {
            self.lexicon.pronoun(&token.text).map(|entry| SubjectMatch {
                indices: vec![i],
                subtype: RoleSubtype::Pronoun,
                person: entry.person,
                number: entry.number,
            })
        });
        if pronoun.is_some() {
            return pronoun;
        }

        let noun_phrase = tokens.windows(2).enumerate().find_map(|(i, pair)| {
            let (det, noun) = (&pair[0], &pair[1]);
            (open(i) && open(i + 1) && self.lexicon.is_determiner(&det.text) && self.is_content_word(noun))
                .then(|| SubjectMatch {
                    indices: vec![i, i + 1],
                    subtype: RoleSubtype::NounPhrase,
                    person: Person::Third,
                    number: noun_number(self.lexicon, &noun.text),
                })
        });
        if noun_phrase.is_some() {
            return noun_phrase;
        }

        // Proper noun, checked against the text as typed
        tokens
            .iter()
            .enumerate()
            .find(|(i, token)| open(*i) && token.is_capitalized() && self.is_content_word(token))
            .map(|(i, _)| SubjectMatch {
                indices: vec![i],
                subtype: RoleSubtype::ProperNoun,
                person: Person::Third,
                number: Number::Singular,
            })
    }

    /// Not a function word and not a recognizable verb form.
    fn is_content_word(&self, token: &Token) -> bool {
        !self.lexicon.knows(&token.text)
            && lemmatize(self.lexicon, &token.text).is_none()
            && !self.is_gerund(token)
    }

    fn find_auxiliary(&self, tokens: &[Token], subject: Option<&SubjectMatch>) -> Option<RoleDetail> {
        let token = tokens
            .iter()
            .find(|t| !t.consumed && self.lexicon.auxiliary_class(&t.text).is_some())?;
        let class = self.lexicon.auxiliary_class(&token.text)?;

        let subtype = match class {
            AuxiliaryClass::Past => RoleSubtype::PastAuxiliary,
            AuxiliaryClass::Present => RoleSubtype::PresentAuxiliary,
            AuxiliaryClass::Negative if token.text.starts_with("did") => RoleSubtype::NegativeSimple,
            AuxiliaryClass::Negative => RoleSubtype::NegativeContinuous,
        };
        let detail = RoleDetail::valid(Role::Auxiliary, subtype, tokens, vec![token.index]);

        if class != AuxiliaryClass::Present {
            return Some(detail);
        }

        // Present auxiliary in a past sentence: suggest was/were for the subject
        let suggestion = match subject {
            Some(s) => past_be(s.person, s.number),
            None if token.text == "are" => "were",
            None => "was",
        };
        let error = DetectedError::new(
            ErrorKind::PresentInPast,
            format!("'{}' is present tense; use '{}' for a past action", token.original_text, suggestion),
            token.original_text.clone(),
            token.span.start,
        )
        .with_suggestion(suggestion.to_string(), 0.9);

        Some(detail.invalid(error))
    }

    fn find_main_verb(&self, tokens: &[Token], aux: Option<RoleSubtype>) -> Option<RoleDetail> {
        // Past forms anywhere take precedence over base forms
        let past = tokens.iter().find_map(|t| {
            if t.consumed {
                None
            } else if self.lexicon.irregular_by_past(&t.text).is_some() {
                Some((t.index, RoleSubtype::IrregularPast))
            } else if self.is_regular_past(&t.text) {
                Some((t.index, RoleSubtype::RegularPast))
            } else {
                None
            }
        });
        if let Some((index, subtype)) = past {
            return Some(RoleDetail::valid(Role::MainVerb, subtype, tokens, vec![index]));
        }

        let token = tokens.iter().find(|t| {
            !t.consumed
                && self.lexicon.is_base_verb(&t.text)
                && !(t.index > 0 && self.lexicon.is_determiner(&tokens[t.index - 1].text))
        })?;

        if aux == Some(RoleSubtype::NegativeSimple) {
            return Some(RoleDetail::valid(
                Role::MainVerb,
                RoleSubtype::BaseAfterNegative,
                tokens,
                vec![token.index],
            ));
        }

        let suggestion = past_form(self.lexicon, &token.text);
        let error = DetectedError::new(
            ErrorKind::BaseVerbInPast,
            format!("'{}' is the base form; the past is '{}'", token.original_text, suggestion),
            token.original_text.clone(),
            token.span.start,
        )
        .with_suggestion(suggestion, 0.85);

        Some(RoleDetail::valid(Role::MainVerb, RoleSubtype::BaseForm, tokens, vec![token.index]).invalid(error))
    }

    fn is_regular_past(&self, word: &str) -> bool {
        word.len() > 3 && word.ends_with("ed") && !self.lexicon.is_ed_exclusion(word)
    }

    fn is_gerund(&self, token: &Token) -> bool {
        token.text.len() > 4 && token.text.ends_with("ing") && !self.lexicon.is_ing_exclusion(&token.text)
    }
}

fn claim(tokens: &mut [Token], indices: &[usize], role: Role) {
    for &i in indices {
        debug_assert!(!tokens[i].consumed, "token {} claimed twice", i);
        tokens[i].role = Some(role);
        tokens[i].consumed = true;
    }
}

fn join_original(tokens: &[Token], indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&i| tokens[i].original_text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn determine_tense(roles: &[RoleDetail]) -> TenseType {
    let find = |role: Role| roles.iter().find(|r| r.role == role);

    let aux = find(Role::Auxiliary);
    let past_aux = aux.is_some_and(|a| {
        a.valid && matches!(a.subtype, RoleSubtype::PastAuxiliary | RoleSubtype::NegativeContinuous)
    });
    let present_aux = aux.is_some_and(|a| a.subtype == RoleSubtype::PresentAuxiliary);

    if past_aux && find(Role::Gerund).is_some() {
        TenseType::PastContinuous
    } else if find(Role::MainVerb).is_some_and(|v| v.valid) {
        TenseType::PastSimple
    } else if present_aux && !past_aux {
        TenseType::PresentError
    } else {
        TenseType::Unknown
    }
}

fn validate(roles: &[RoleDetail], tense: TenseType) -> Vec<DetectedError> {
    let mut errors = Vec::new();
    let has = |role: Role| roles.iter().any(|r| r.role == role);

    if !has(Role::Subject) {
        errors.push(DetectedError::missing(ErrorKind::MissingSubject));
    }

    match tense {
        TenseType::PastContinuous | TenseType::PresentError => {
            if !has(Role::Auxiliary) {
                errors.push(DetectedError::missing(ErrorKind::MissingAuxiliary));
            }
            if !has(Role::Gerund) {
                errors.push(DetectedError::missing(ErrorKind::MissingGerund));
            }
        }
        TenseType::PastSimple => {}
        TenseType::Unknown => {
            let past_aux = roles
                .iter()
                .any(|r| r.role == Role::Auxiliary && r.subtype == RoleSubtype::PastAuxiliary);
            if past_aux && !has(Role::Gerund) && !has(Role::MainVerb) {
                errors.push(DetectedError::missing(ErrorKind::MissingGerund));
            } else if !has(Role::MainVerb) {
                errors.push(DetectedError::missing(ErrorKind::MissingVerb));
            }
        }
    }

    errors
}
