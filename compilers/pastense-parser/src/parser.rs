use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0, one_of},
    combinator::{map, recognize},
    multi::many0,
    sequence::pair,
    IResult,
};
use crate::token::Span;

/// Characters that can appear inside an English word.
/// Apostrophes keep contractions (wasn't, didn't) in one piece.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '\u{2019}'
}

#[derive(Debug, Clone)]
pub enum RawToken<'a> {
    Word(&'a str),
    Punct(char),
}

/// A word, optionally hyphenated: "well-known", "ice-cream".
fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(is_word_char),
        many0(pair(char('-'), take_while1(is_word_char))),
    ))(input)
}

pub fn parse_with_spans(original_input: &str) -> Vec<(Span, RawToken)> {
    let mut input = original_input;
    let mut result = Vec::new();

    loop {
        // 1. Skip whitespace
        let (next_input, _) = match multispace0::<&str, nom::error::Error<&str>>(input) {
            Ok(res) => res,
            Err(_) => break,
        };
        input = next_input;

        if input.is_empty() {
            break;
        }

        // 2. Try to match a token
        let parse_res: IResult<&str, RawToken> = alt((
            map(word, RawToken::Word),
            map(one_of(".,;:?!\"()"), RawToken::Punct),
        ))(input);

        match parse_res {
            Ok((next_input, token)) => {
                let len = input.len() - next_input.len();
                let start = original_input.len() - input.len();

                result.push((Span::new(start, start + len), token));
                input = next_input;
            }
            Err(_) => {
                // Skip one char to recover (resilient parsing)
                if let Some(c) = input.chars().next() {
                    input = &input[c.len_utf8()..];
                } else {
                    break;
                }
            }
        }
    }

    result
}

/// Trimmed, whitespace-collapsed, punctuation-free, lowercase form.
pub fn normalize(sentence: &str) -> String {
    parse_with_spans(sentence)
        .into_iter()
        .filter_map(|(_, raw)| match raw {
            RawToken::Word(w) => Some(w.to_lowercase().replace('\u{2019}', "'")),
            RawToken::Punct(_) => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn word_count(sentence: &str) -> usize {
    parse_with_spans(sentence)
        .iter()
        .filter(|(_, raw)| matches!(raw, RawToken::Word(_)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_point_into_input() {
        let input = "  When she called, I wasn't ready.";
        let tokens = parse_with_spans(input);

        let words: Vec<&str> = tokens
            .iter()
            .filter_map(|(span, raw)| match raw {
                RawToken::Word(_) => Some(&input[span.start..span.end]),
                RawToken::Punct(_) => None,
            })
            .collect();
        assert_eq!(words, vec!["When", "she", "called", "I", "wasn't", "ready"]);
        assert!(matches!(tokens.last(), Some((_, RawToken::Punct('.')))));
    }

    #[test]
    fn test_normalize_collapses_and_strips() {
        assert_eq!(normalize("  I   WAS  walking,  home! "), "i was walking home");
        assert_eq!(normalize("She wasn\u{2019}t there"), "she wasn't there");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_unknown_symbols_are_skipped() {
        assert_eq!(word_count("I * was # walking"), 3);
        assert_eq!(normalize("ice-cream -- yes"), "ice-cream yes");
    }
}
