//! Grammar parser for UCUM expressions (`spec.md` §4.4), built on `nom`
//! over the lexer's token stream rather than raw bytes:
//!
//! ```text
//! expr      := '/' term (op term)* | term (op term)*
//! op        := '.' | '/'
//! term      := component exponent?
//! component := '(' expr ')' | number | annotatable_atom
//! exponent  := sign? digits
//! ```
//!
//! Grounded on the teacher's `ucum-core/src/parser.rs`, which is "Internal
//! UCUM expression parsers implemented with `nom`" (its `parse_product` /
//! `parse_quotient` / `parse_factor` are exactly this grammar's
//! product/quotient/term-with-exponent layers). This module follows the
//! same shape, using `nom`'s `alt`/`opt`/`many0` for the grammar's
//! alternation and repetition, over a custom token-slice input and a
//! `Result<_, UcumError>`-carrying error type; the pieces that need
//! lookahead the grammar alone can't express (whether `sym[bracket]` is a
//! single literal catalog code or a dynamic log-reference, exponent
//! adjacency) are explicit token inspection the same way the teacher's own
//! `parse_factor` falls back to a hand-rolled scan for implicit exponent
//! suffixes after its `nom` combinators produce the base expression.
//!
//! Error-tolerant parsing (`spec.md` §4.4) spans both this module and
//! [`crate::evaluator`]: some corrections (full-name-to-code,
//! missing-bracket) only become necessary once atom lookup fails, which
//! happens during evaluation, not parsing. The retry loop that applies
//! [`corrections::RULES`] therefore lives in the crate's top-level
//! `validate` function, which has access to both stages; this module only
//! exposes the strict (non-tolerant) parse and the correction rules
//! themselves.

use crate::ast::{UnitExpr, UnitFactor};
use crate::error::{Span, UcumError};
use crate::lexer::{lex, Token, TokenKind};
use crate::registry;
use nom::{branch::alt, combinator::opt, multi::many0, IResult};

pub use corrections::Correction;

type Toks<'a> = &'a [Token];

/// `nom`'s error channel, carrying the crate's own [`UcumError`] instead of
/// a generic error-kind tag: token parsers that don't match return
/// `Err(Error(_))` so `alt`/`opt`/`many0` can try the next alternative or
/// stop cleanly; a parser that matched its lead token but then found the
/// input genuinely malformed returns `Err(Failure(_))`, which `nom`
/// propagates past any enclosing `alt`/`many0` instead of swallowing it.
#[derive(Debug, Clone)]
struct PErr(UcumError);

impl<'a> nom::error::ParseError<Toks<'a>> for PErr {
    fn from_error_kind(input: Toks<'a>, _kind: nom::error::ErrorKind) -> Self {
        PErr(UcumError::invalid_syntax("unexpected token", input.first().map(|t| t.span)))
    }

    fn append(_input: Toks<'a>, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

type PRes<'a, O> = IResult<Toks<'a>, O, PErr>;

fn to_ucum_error(err: nom::Err<PErr>) -> UcumError {
    match err {
        nom::Err::Error(PErr(e)) | nom::Err::Failure(PErr(e)) => e,
        nom::Err::Incomplete(_) => UcumError::invalid_syntax("incomplete expression", None),
    }
}

/// Parse `input` with no tolerance for mistakes; used both as the first
/// attempt and to validate a corrected rewrite.
pub fn parse_strict(input: &str, case_sensitive: bool) -> Result<UnitExpr, UcumError> {
    let tokens = lex(input)?;
    let (rest, expr) = parse_expr(&tokens, case_sensitive).map_err(to_ucum_error)?;
    if let Some(tok) = rest.first() {
        return Err(UcumError::invalid_syntax(
            format!("unexpected trailing token at {}", tok.span.start),
            Some(tok.span),
        ));
    }
    Ok(expr)
}

fn one_token<'a>(input: Toks<'a>, pred: fn(&TokenKind) -> bool) -> PRes<'a, &'a Token> {
    match input.split_first() {
        Some((tok, rest)) if pred(&tok.kind) => Ok((rest, tok)),
        _ => Err(nom::Err::Error(PErr(UcumError::invalid_syntax("unexpected token", input.first().map(|t| t.span))))),
    }
}

fn dot(input: Toks<'_>) -> PRes<'_, &Token> {
    one_token(input, |k| matches!(k, TokenKind::Dot))
}

fn slash(input: Toks<'_>) -> PRes<'_, &Token> {
    one_token(input, |k| matches!(k, TokenKind::Slash))
}

/// `expr := '/' term (op term)* | term (op term)*` (`spec.md` §4.4): a
/// leading solidus negates the first term's exponent; every subsequent
/// `.`/`/` folds its term into a flat factor list, `/` negating that
/// term's own exponent rather than wrapping it in another `Power` layer.
fn parse_expr(input: Toks<'_>, cs: bool) -> PRes<'_, UnitExpr> {
    let (input, leading_slash) = opt(slash)(input)?;
    let (input, first) = parse_term(input, cs)?;
    let mut factors = vec![negate_if(first, leading_slash.is_some())];

    let (input, rest) = many0(alt((
        nom::combinator::map(nom::sequence::preceded(dot, |i| parse_term(i, cs)), |t| (false, t)),
        nom::combinator::map(nom::sequence::preceded(slash, |i| parse_term(i, cs)), |t| (true, t)),
    )))(input)?;

    for (invert_flag, factor) in rest {
        factors.push(negate_if(factor, invert_flag));
    }

    let expr = if factors.len() == 1 {
        let only = factors.into_iter().next().unwrap();
        if only.exponent == 1 { only.expr } else { UnitExpr::Power(Box::new(only.expr), only.exponent) }
    } else {
        UnitExpr::Product(factors)
    };
    Ok((input, expr))
}

/// `term := component exponent?`. The exponent, if present, must sit
/// immediately after the component with no gap (`spec.md` §4.3 bans
/// whitespace everywhere, so the only way a gap can appear here is an
/// annotation sitting between the component and a following digit —
/// which must not be read as an exponent).
fn parse_term(input: Toks<'_>, cs: bool) -> PRes<'_, UnitFactor> {
    let (rest, component) = parse_component(input, cs)?;
    let consumed = input.len() - rest.len();
    let prev_end = if consumed > 0 { input[consumed - 1].span.end } else { 0 };
    let (rest, exponent) = try_parse_exponent(rest, prev_end)?;
    Ok((rest, UnitFactor { expr: component, exponent: exponent.unwrap_or(1) }))
}

/// `component := '(' expr ')' | number | annotatable_atom`. Atom
/// resolution's prefix/bracket ambiguity (`spec.md` §4.4) needs one token
/// of lookahead beyond what the grammar alone states, handled here by
/// direct inspection rather than a combinator, same as the teacher's own
/// `parse_factor` falling out of its `nom` pipeline for the implicit
/// trailing-exponent scan.
fn parse_component(input: Toks<'_>, cs: bool) -> PRes<'_, UnitExpr> {
    match input.first() {
        Some(Token { kind: TokenKind::LParen, .. }) => {
            let (rest, inner) = parse_expr(&input[1..], cs)?;
            match rest.first() {
                Some(Token { kind: TokenKind::RParen, .. }) => Ok((&rest[1..], inner)),
                other => Err(nom::Err::Failure(PErr(UcumError::invalid_syntax("expected ')'", other.map(|t| t.span))))),
            }
        }
        Some(Token { kind: TokenKind::Number(n), .. }) => Ok((&input[1..], UnitExpr::Numeric(*n))),
        Some(Token { kind: TokenKind::Symbol(sym), span }) => parse_symbol_component(input, sym.clone(), *span, cs),
        Some(Token { kind: TokenKind::Annotation(text), span }) => {
            let rest = &input[1..];
            if !rest.is_empty() {
                return Err(nom::Err::Failure(PErr(UcumError::invalid_syntax(
                    "misplaced annotation (expected immediately after its atom)",
                    Some(*span),
                ))));
            }
            Ok((rest, UnitExpr::Annotated(Box::new(UnitExpr::Numeric(1.0)), text.clone())))
        }
        other => Err(nom::Err::Failure(PErr(UcumError::invalid_syntax(
            "expected a unit atom, number, or '('",
            other.map(|t| t.span),
        )))),
    }
}

/// A bracket symbol token immediately (no gap) following an atom symbol
/// token is either (a) the two tokens spelling out a single literal atom
/// code that happens to contain brackets (e.g. `B[SPL]`, a real catalog
/// entry) or (b) a `B[10.nV]`-style dynamic reference, parsed as a nested
/// sub-expression. Literal catalog codes take priority.
fn parse_symbol_component(input: Toks<'_>, sym: String, sym_span: Span, cs: bool) -> PRes<'_, UnitExpr> {
    let end = sym_span.end;
    let rest = &input[1..];

    if let Some(Token { kind: TokenKind::Symbol(next_sym), span: next_span }) = rest.first() {
        if next_span.start == end && next_sym.starts_with('[') && next_sym.ends_with(']') {
            let combined = format!("{sym}{next_sym}");
            if registry::atom_by_code(&combined, cs).is_some() {
                let combined_span = Span::new(sym_span.start, next_span.end);
                let base = UnitExpr::Symbol(combined, combined_span);
                let (rest, base) = attach_annotation(&rest[1..], base);
                return Ok((rest, base));
            }

            let bracket_text = next_sym.clone();
            let interior = &bracket_text[1..bracket_text.len() - 1];
            let reference = parse_strict(interior, cs).map_err(|e| nom::Err::Failure(PErr(e)))?;
            let base = UnitExpr::LogRef(sym, sym_span, Box::new(reference));
            let (rest, base) = attach_annotation(&rest[1..], base);
            return Ok((rest, base));
        }
    }

    let base = UnitExpr::Symbol(sym, sym_span);
    let (rest, base) = attach_annotation(rest, base);
    Ok((rest, base))
}

fn attach_annotation(input: Toks<'_>, base: UnitExpr) -> (Toks<'_>, UnitExpr) {
    match input.first() {
        Some(Token { kind: TokenKind::Annotation(text), .. }) => (&input[1..], UnitExpr::Annotated(Box::new(base), text.clone())),
        _ => (input, base),
    }
}

/// `exponent := sign? digits`, attached directly after its component
/// (`m2`, `s-1`) or after an explicit `^` (this crate's own extension
/// atop the published grammar, accepting `m^2`, `m^-2`, `m^+2` the same
/// shapes the unmarked form does).
fn try_parse_exponent(input: Toks<'_>, prev_end: usize) -> PRes<'_, Option<i32>> {
    match input.first() {
        Some(Token { kind: TokenKind::Caret, span }) if span.start == prev_end => {
            let caret_end = span.end;
            let rest = &input[1..];
            match rest.first() {
                Some(Token { kind: TokenKind::Minus, span: sign_span }) if sign_span.start == caret_end => {
                    signed_exponent_digits(&rest[1..], sign_span.end, true)
                }
                Some(Token { kind: TokenKind::Plus, span: sign_span }) if sign_span.start == caret_end => {
                    signed_exponent_digits(&rest[1..], sign_span.end, false)
                }
                _ => parse_plain_digits(rest),
            }
        }
        Some(Token { kind: TokenKind::Minus, span }) if span.start == prev_end => {
            match input.get(1) {
                Some(Token { kind: TokenKind::Number(_), span: nspan }) if nspan.start == span.end => {
                    signed_exponent_digits(&input[1..], span.end, true)
                }
                _ => Ok((input, None)),
            }
        }
        Some(Token { kind: TokenKind::Plus, span }) if span.start == prev_end => {
            match input.get(1) {
                Some(Token { kind: TokenKind::Number(_), span: nspan }) if nspan.start == span.end => {
                    signed_exponent_digits(&input[1..], span.end, false)
                }
                _ => Ok((input, None)),
            }
        }
        Some(Token { kind: TokenKind::Number(_), span }) if span.start == prev_end => parse_plain_digits(input),
        _ => Ok((input, None)),
    }
}

fn signed_exponent_digits(input: Toks<'_>, sign_end: usize, negative: bool) -> PRes<'_, Option<i32>> {
    match input.first() {
        Some(Token { kind: TokenKind::Number(n), span }) if span.start == sign_end => {
            if n.fract() != 0.0 {
                return Err(nom::Err::Failure(PErr(UcumError::invalid_syntax("exponents must be integers", Some(*span)))));
            }
            let value = if negative { -(*n as i32) } else { *n as i32 };
            Ok((&input[1..], Some(value)))
        }
        other => Err(nom::Err::Failure(PErr(UcumError::invalid_syntax("expected an exponent", other.map(|t| t.span))))),
    }
}

fn parse_plain_digits(input: Toks<'_>) -> PRes<'_, Option<i32>> {
    match input.first() {
        Some(Token { kind: TokenKind::Number(n), span }) => {
            if n.fract() != 0.0 {
                return Err(nom::Err::Failure(PErr(UcumError::invalid_syntax("exponents must be integers", Some(*span)))));
            }
            Ok((&input[1..], Some(*n as i32)))
        }
        other => Err(nom::Err::Failure(PErr(UcumError::invalid_syntax("expected an exponent", other.map(|t| t.span))))),
    }
}

fn negate_if(mut factor: UnitFactor, cond: bool) -> UnitFactor {
    if cond {
        factor.exponent = -factor.exponent;
    }
    factor
}

/// Error-tolerant correction rules (`spec.md` §4.4, §9). Each rule looks at
/// the raw input and the error the strict parse produced, and — only when
/// it recognizes a specific, common mistake — returns a rewritten string
/// plus a record of what changed. `validate` retries the strict parser on
/// the rewrite; a rule that doesn't fix the problem is simply discarded.
pub mod corrections {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Correction {
        pub span: Span,
        pub original: String,
        pub rewritten: String,
        pub rule: &'static str,
    }

    pub type Rule = fn(&str, &UcumError) -> Option<(String, Correction)>;

    pub const RULES: &[Rule] = &[
        full_name_to_code,
        missing_dot,
        brace_for_bracket,
        missing_bracket,
        reordered_annotation,
    ];

    /// A full unit name used where its code was expected, e.g. `meter`
    /// instead of `m`: resolve the offending span against
    /// [`registry::atom_by_name`] and substitute the code.
    pub(crate) fn full_name_to_code(input: &str, err: &UcumError) -> Option<(String, Correction)> {
        let (atom, span) = match err {
            UcumError::UnknownAtom { atom, span: Some(span) } => (atom.clone(), *span),
            _ => return None,
        };
        let record = registry::atom_by_name(&atom)?;
        let mut rewritten = String::with_capacity(input.len());
        rewritten.push_str(&input[..span.start]);
        rewritten.push_str(record.code);
        rewritten.push_str(&input[span.end.min(input.len())..]);
        Some((
            rewritten,
            Correction { span, original: atom, rewritten: record.code.to_string(), rule: "full_name_to_code" },
        ))
    }

    /// Two atoms run together with no `.` between them, e.g. `kgm` meant
    /// as `kg.m`: insert a `.` at the point the parser choked on an
    /// unexpected trailing symbol.
    pub(crate) fn missing_dot(input: &str, err: &UcumError) -> Option<(String, Correction)> {
        let span = match err {
            UcumError::InvalidSyntax { span: Some(span), reason } if reason.contains("unexpected trailing token") => {
                *span
            }
            _ => return None,
        };
        if span.start == 0 || span.start > input.len() {
            return None;
        }
        let mut rewritten = String::with_capacity(input.len() + 1);
        rewritten.push_str(&input[..span.start]);
        rewritten.push('.');
        rewritten.push_str(&input[span.start..]);
        Some((
            rewritten,
            Correction {
                span: Span::point(span.start),
                original: String::new(),
                rewritten: ".".to_string(),
                rule: "missing_dot",
            },
        ))
    }

    /// `{code}` used where `[code]` was meant: if the whole input is a
    /// single annotation whose text is itself a known bracketed atom code
    /// (catalog codes for bracketed atoms are stored with their brackets,
    /// e.g. `[degF]`, never as bare `degF`), swap the braces for brackets.
    pub(crate) fn brace_for_bracket(input: &str, _err: &UcumError) -> Option<(String, Correction)> {
        let trimmed = input.trim();
        let inner = trimmed.strip_prefix('{')?.strip_suffix('}')?;
        let rewritten = format!("[{inner}]");
        registry::atom_by_code(&rewritten, true)?;
        Some((
            rewritten.clone(),
            Correction { span: Span::new(0, input.len()), original: input.to_string(), rewritten, rule: "brace_for_bracket" },
        ))
    }

    /// `validate`'s success path calls this directly (not through
    /// [`RULES`]): a bare `{atom}` annotation is valid unity-annotated
    /// syntax on its own (`spec.md` §4.3 step 2) and never fails to parse,
    /// so [`brace_for_bracket`] can never be reached via the
    /// error-triggered retry loop. When its text names a known bracketed
    /// atom code, the mixup is still worth surfacing as a non-fatal
    /// warning rather than passing silently.
    pub fn bare_annotation_bracket_hint(input: &str) -> Option<Correction> {
        let dummy = UcumError::EmptyInput;
        brace_for_bracket(input, &dummy).map(|(_, correction)| correction)
    }

    /// A code that only exists in bracketed form was given without its
    /// brackets, e.g. `in_i` instead of `[in_i]`.
    pub(crate) fn missing_bracket(input: &str, err: &UcumError) -> Option<(String, Correction)> {
        let (atom, span) = match err {
            UcumError::UnknownAtom { atom, span } => (atom.clone(), *span),
            _ => return None,
        };
        if atom.starts_with('[') {
            return None;
        }
        let bracketed = format!("[{atom}]");
        registry::atom_by_code(&bracketed, true)?;
        let span = span?;
        let mut rewritten = String::with_capacity(input.len() + 2);
        rewritten.push_str(&input[..span.start]);
        rewritten.push_str(&bracketed);
        rewritten.push_str(&input[span.end.min(input.len())..]);
        Some((
            rewritten,
            Correction { span, original: atom, rewritten: bracketed, rule: "missing_bracket" },
        ))
    }

    /// An annotation written before its atom instead of after, e.g.
    /// `{RBC}mL` instead of `mL{RBC}`: swap the two spans.
    pub(crate) fn reordered_annotation(input: &str, _err: &UcumError) -> Option<(String, Correction)> {
        let start = input.find('{')?;
        if start != 0 {
            return None;
        }
        let close = input.find('}')?;
        let annotation = &input[start..=close];
        let rest = &input[close + 1..];
        if rest.is_empty() {
            return None;
        }
        let rewritten = format!("{rest}{annotation}");
        Some((
            rewritten.clone(),
            Correction {
                span: Span::new(0, input.len()),
                original: input.to_string(),
                rewritten,
                rule: "reordered_annotation",
            },
        ))
    }
}
