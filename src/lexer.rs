//! Lexer and annotation handler (`spec.md` §4.3).
//!
//! Turns a raw expression string into a flat token stream with source
//! offsets, rejecting whitespace, extracting `{...}` annotations as their
//! own token kind, and recognizing bracketed atoms, numeric factors,
//! operators, and exponent markers up front so the parser never has to
//! re-discover token boundaries.
//!
//! Built on `nom` (grounded on the teacher's `ucum-core/src/parser.rs`,
//! which tokenizes and parses UCUM expressions with `nom` combinators in
//! one pass); the structurally recursive pieces that don't fit a
//! combinator — balanced-brace annotation bodies with backslash escapes,
//! balanced-bracket atom codes — are hand-rolled scans the same way the
//! teacher's own `annotation_body` is a manual `char_indices` loop sitting
//! inside an otherwise `nom`-combinator file.

use crate::error::{Span, UcumError};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1},
    combinator::{map_res, opt, recognize},
    sequence::{pair, preceded, tuple},
    IResult,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    /// An atom code candidate: a run of identifier-ish characters, or a
    /// balanced `[...]` bracketed atom taken verbatim (brackets included).
    Symbol(String),
    /// The inert text of a `{...}` annotation, without the braces. Kept as
    /// an ordinary token in the stream — annotations never contain
    /// whitespace-bearing gaps between real tokens, so the parser can
    /// attach one to the component it immediately follows just by stream
    /// order, with no separate position bookkeeping.
    Annotation(String),
    Dot,
    Slash,
    Caret,
    Plus,
    Minus,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '\'' || c == '_' || c == '%' || (!c.is_ascii() && c != '{' && c != '}')
}

fn offset(original: &str, rest: &str) -> usize {
    original.len() - rest.len()
}

/// UCUM's power-of-ten literal: the bare base `10` followed by `*` or `^`
/// and a signed exponent, e.g. `10*-6`, `10^3` (`10*-6.mol/L` is the
/// example in the grammar overview). Tried before the generic decimal
/// parser; on any other digit run it simply doesn't match and `nom`
/// backtracks with the input untouched.
fn power_of_ten_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        preceded(
            tag("10"),
            pair(alt((char('*'), char('^'))), recognize(pair(opt(alt((char('+'), char('-')))), digit1))),
        ),
        |(_marker, exp): (char, &str)| exp.parse::<i32>().map(|e| 10f64.powi(e)),
    )(input)
}

/// An ordinary decimal literal: a digit run, optionally `.` + digit run
/// (only consumed when a digit actually follows — otherwise `.` is left
/// for the product operator), optionally an `e`/`E` exponent.
fn decimal_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            digit1,
            opt(pair(char('.'), digit1)),
            opt(tuple((alt((char('e'), char('E'))), opt(alt((char('+'), char('-')))), digit1))),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

fn number_literal(input: &str) -> IResult<&str, f64> {
    alt((power_of_ten_literal, decimal_literal))(input)
}

fn operator(input: &str) -> IResult<&str, TokenKind> {
    alt((
        nom::combinator::map(char('.'), |_| TokenKind::Dot),
        nom::combinator::map(char('/'), |_| TokenKind::Slash),
        nom::combinator::map(char('^'), |_| TokenKind::Caret),
        nom::combinator::map(char('('), |_| TokenKind::LParen),
        nom::combinator::map(char(')'), |_| TokenKind::RParen),
        nom::combinator::map(char('+'), |_| TokenKind::Plus),
        nom::combinator::map(char('-'), |_| TokenKind::Minus),
    ))(input)
}

fn symbol(input: &str) -> IResult<&str, &str> {
    take_while1(is_symbol_char)(input)
}

/// A `{...}` annotation body, balanced against a single nesting level of
/// `\`-escaping (UCUM forbids nested braces). Grounded on the teacher's
/// `annotation_body`, which is the same manual scan embedded in its own
/// otherwise-`nom` parser file.
fn annotation<'a>(original: &str, rest: &'a str, start: usize) -> Result<(&'a str, Token), UcumError> {
    let mut escaped = false;
    let mut end_idx = None;
    for (idx, ch) in rest.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '}' => {
                end_idx = Some(idx);
                break;
            }
            _ => {}
        }
    }
    let end_idx = end_idx.ok_or_else(|| {
        UcumError::invalid_syntax("unbalanced '{' annotation", Some(Span::new(start, original.len())))
    })?;
    let text = rest[1..end_idx].to_string();
    let next_rest = &rest[end_idx + 1..];
    let span_end = start + end_idx + 1;
    Ok((next_rest, Token { kind: TokenKind::Annotation(text), span: Span::new(start, span_end) }))
}

/// A balanced `[...]` bracketed atom, taken verbatim brackets-included.
/// Grounded on the same manual-scan idiom as [`annotation`] above.
fn bracketed_atom<'a>(original: &str, rest: &'a str, start: usize) -> Result<(&'a str, &'a str), UcumError> {
    let mut depth = 0i32;
    let mut end_idx = None;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    end_idx = Some(idx + ch.len_utf8());
                    break;
                }
            }
            _ => {}
        }
    }
    let end_idx = end_idx.ok_or_else(|| {
        UcumError::invalid_syntax("unbalanced '[' bracketed atom", Some(Span::new(start, original.len())))
    })?;
    Ok((&rest[end_idx..], &rest[..end_idx]))
}

/// Tokenize `input`. Returns `DisallowedWhitespace` at the first
/// whitespace byte found outside a `{...}` annotation span (annotations
/// are free text and may contain spaces; everything else in a UCUM
/// expression may not, per `spec.md` §4.3 step 1).
pub fn lex(input: &str) -> Result<Vec<Token>, UcumError> {
    if input.is_empty() {
        return Err(UcumError::EmptyInput);
    }

    let mut tokens = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let pos = offset(input, rest);
        let c = rest.chars().next().expect("loop guarded by !rest.is_empty()");

        if c == '{' {
            let (next_rest, token) = annotation(input, rest, pos)?;
            tokens.push(token);
            rest = next_rest;
            continue;
        }

        if c.is_whitespace() {
            return Err(UcumError::DisallowedWhitespace { position: pos });
        }

        if c == '[' {
            let (next_rest, text) = bracketed_atom(input, rest, pos)?;
            tokens.push(Token { kind: TokenKind::Symbol(text.to_string()), span: Span::new(pos, offset(input, next_rest)) });
            rest = next_rest;
            continue;
        }

        if c.is_ascii_digit() {
            let (next_rest, value) = number_literal(rest).map_err(|_| {
                UcumError::invalid_syntax("malformed number", Some(Span::point(pos)))
            })?;
            tokens.push(Token { kind: TokenKind::Number(value), span: Span::new(pos, offset(input, next_rest)) });
            rest = next_rest;
            continue;
        }

        if let Ok((next_rest, kind)) = operator(rest) {
            tokens.push(Token { kind, span: Span::point(pos) });
            rest = next_rest;
            continue;
        }

        if is_symbol_char(c) {
            let (next_rest, text) = symbol(rest).expect("is_symbol_char(c) guarantees take_while1 matches");
            tokens.push(Token { kind: TokenKind::Symbol(text.to_string()), span: Span::new(pos, offset(input, next_rest)) });
            rest = next_rest;
            continue;
        }

        return Err(UcumError::invalid_syntax(format!("unexpected character '{c}'"), Some(Span::point(pos))));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_ten_literal_with_star_and_negative_exponent() {
        let out = lex("10*-6").unwrap();
        assert_eq!(out, vec![Token { kind: TokenKind::Number(1e-6), span: Span::new(0, 5) }]);
    }

    #[test]
    fn power_of_ten_literal_with_caret_and_positive_exponent() {
        let out = lex("10^3").unwrap();
        assert_eq!(out, vec![Token { kind: TokenKind::Number(1000.0), span: Span::new(0, 4) }]);
    }

    #[test]
    fn power_of_ten_literal_with_star_and_no_sign() {
        let out = lex("10*3").unwrap();
        assert_eq!(out, vec![Token { kind: TokenKind::Number(1000.0), span: Span::new(0, 4) }]);
    }

    #[test]
    fn power_of_ten_literal_followed_by_more_tokens() {
        let out = lex("10*-6.mol").unwrap();
        assert_eq!(out[0], Token { kind: TokenKind::Number(1e-6), span: Span::new(0, 5) });
        assert_eq!(out[1], Token { kind: TokenKind::Dot, span: Span::point(5) });
        assert_eq!(out[2], Token { kind: TokenKind::Symbol("mol".to_string()), span: Span::new(6, 9) });
    }

    #[test]
    fn plain_ten_without_marker_is_an_ordinary_number() {
        let out = lex("10.mol").unwrap();
        assert_eq!(out[0], Token { kind: TokenKind::Number(10.0), span: Span::new(0, 2) });
    }

    #[test]
    fn non_ten_base_does_not_trigger_power_of_ten_handling() {
        let err = lex("2*3").unwrap_err();
        assert_eq!(err.code(), "InvalidSyntax");
    }

    #[test]
    fn annotation_is_its_own_token() {
        let out = lex("m{annotation text}").unwrap();
        assert_eq!(out[0], Token { kind: TokenKind::Symbol("m".to_string()), span: Span::new(0, 1) });
        assert_eq!(
            out[1],
            Token { kind: TokenKind::Annotation("annotation text".to_string()), span: Span::new(1, 19) }
        );
    }

    #[test]
    fn unbalanced_annotation_is_a_syntax_error() {
        let err = lex("m{oops").unwrap_err();
        assert_eq!(err.code(), "InvalidSyntax");
    }

    #[test]
    fn unbalanced_bracket_is_a_syntax_error() {
        let err = lex("[in_i").unwrap_err();
        assert_eq!(err.code(), "InvalidSyntax");
    }

    #[test]
    fn whitespace_outside_annotation_is_rejected() {
        let err = lex("kg m").unwrap_err();
        assert_eq!(err.code(), "DisallowedWhitespace");
    }
}
