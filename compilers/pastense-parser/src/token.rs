use pastense_protocol::Role;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One word of the analyzed sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Lowercased, apostrophes normalized
    pub text: String,
    /// As typed by the learner
    pub original_text: String,
    pub index: usize,
    pub span: Span,
    pub role: Option<Role>,
    pub consumed: bool,
}

impl Token {
    pub fn new(original: &str, index: usize, span: Span) -> Self {
        Self {
            text: original.to_lowercase().replace('\u{2019}', "'"),
            original_text: original.to_string(),
            index,
            span,
            role: None,
            consumed: false,
        }
    }

    pub fn is_capitalized(&self) -> bool {
        self.original_text
            .chars()
            .next()
            .is_some_and(char::is_uppercase)
    }
}
