pub mod parser;
pub mod structure;
pub mod token;

pub use parser::{normalize, word_count};
pub use structure::{RoleDetail, RoleSubtype, StructureAnalyzer, StructureResult};
pub use token::{Span, Token};

use crate::parser::{parse_with_spans, RawToken};

#[derive(Debug, Default, Clone, Copy)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Self
    }

    /// Primary entry point: Text -> word tokens, indexed in order.
    /// Punctuation separates words but never becomes a token.
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        parse_with_spans(input)
            .into_iter()
            .filter_map(|(span, raw)| match raw {
                RawToken::Word(_) => Some(span),
                RawToken::Punct(_) => None,
            })
            .enumerate()
            .map(|(index, span)| Token::new(&input[span.start..span.end], index, span))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_integration() {
        let tokens = Lexer::new().tokenize("Yesterday, I WASN\u{2019}T walking!");

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["yesterday", "i", "wasn't", "walking"]);

        let indices: Vec<usize> = tokens.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);

        assert_eq!(tokens[2].original_text, "WASN\u{2019}T");
        assert_eq!(tokens[1].span, Span::new(11, 12));
        assert!(tokens.iter().all(|t| t.role.is_none() && !t.consumed));
    }

    #[test]
    fn test_empty_input_has_no_tokens() {
        assert!(Lexer::new().tokenize("").is_empty());
        assert!(Lexer::new().tokenize(" ,.! ").is_empty());
    }
}
