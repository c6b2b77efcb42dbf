//! Parser, dimensional algebra, and conversion engine for the Unified Code
//! for Units of Measure (UCUM).
//!
//! The public surface is deliberately small: [`validate`], [`convert`],
//! [`get_commensurables`], and [`get_specified_unit`], mirroring the
//! Validator Façade from the specification this crate implements. Everything
//! else — the lexer, parser, catalog, arithmetic engine, and converter — is
//! `pub` for composability but is not required for ordinary use.

mod arithmetic;
mod ast;
mod convert;
mod error;
mod evaluator;
mod lexer;
mod parser;
mod registry;
mod special_units;
#[cfg(feature = "suggestions")]
mod suggestions;
mod types;

pub use ast::{UnitExpr, UnitFactor};
pub use error::{Span, UcumError};
pub use parser::corrections::Correction;
pub use registry::init;
pub use types::{Dimension, Prefix, SpecialKind, UnitRecord, UnitValue};
pub use types::{
    DIM_CHARGE, DIM_LENGTH, DIM_LUMINOUS, DIM_MASS, DIM_PLANE_ANGLE, DIM_TEMPERATURE, DIM_TIME,
    MAX_PREFIX_EXPONENT,
};

/// Severity of a single diagnostic produced by [`validate`] (`spec.md` §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Parsing cannot proceed past this point; `ValidationResult::valid` is
    /// `false` whenever any `Fatal` message is present.
    Fatal,
    /// A corrective rewrite was applied, or other non-blocking observation.
    Warning,
}

/// One diagnostic entry, in source-offset order (`spec.md` §5 ordering
/// guarantee).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub severity: Severity,
    pub text: String,
    pub span: Option<Span>,
}

/// Result of [`validate`] (`spec.md` §4.7).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    pub valid: bool,
    pub unit: Option<UnitValue>,
    pub messages: Vec<Message>,
    pub suggestions: Vec<String>,
}

/// Result of [`convert`] (`spec.md` §4.7).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionResult {
    pub magnitude: f64,
    pub messages: Vec<Message>,
}

/// Parse and evaluate `expression`, running in tolerant mode: a strict
/// attempt first, then — if that fails, whether at the syntax stage or at
/// atom-lookup time during evaluation — each of the five corrective
/// rewrites in [`parser::corrections`] is tried in turn against the
/// original text. `valid` is `true` iff no fatal error occurred; corrective
/// rewrites are reported as `Warning` messages, never as failures.
pub fn validate(expression: &str, case_sensitive: bool) -> ValidationResult {
    registry::init();

    match parse_and_evaluate(expression, case_sensitive) {
        Ok(unit) => {
            let mut messages = Vec::new();
            if let Some(correction) = parser::corrections::bare_annotation_bracket_hint(expression) {
                messages.push(Message {
                    severity: Severity::Warning,
                    text: format!(
                        "applied correction '{}': '{}' -> '{}'",
                        correction.rule, correction.original, correction.rewritten
                    ),
                    span: Some(correction.span),
                });
            }
            ValidationResult { valid: true, unit: Some(unit), messages, suggestions: Vec::new() }
        }
        Err(first_err) => {
            for rule in parser::corrections::RULES {
                if let Some((rewritten, correction)) = rule(expression, &first_err) {
                    if let Ok(unit) = parse_and_evaluate(&rewritten, case_sensitive) {
                        let message = Message {
                            severity: Severity::Warning,
                            text: format!(
                                "applied correction '{}': '{}' -> '{}'",
                                correction.rule, correction.original, correction.rewritten
                            ),
                            span: Some(correction.span),
                        };
                        return ValidationResult {
                            valid: true,
                            unit: Some(unit),
                            messages: vec![message],
                            suggestions: Vec::new(),
                        };
                    }
                }
            }
            validation_failure(expression, first_err)
        }
    }
}

fn parse_and_evaluate(input: &str, case_sensitive: bool) -> Result<UnitValue, UcumError> {
    let expr = parser::parse_strict(input, case_sensitive)?;
    evaluator::evaluate(&expr, case_sensitive)
}

fn validation_failure(expression: &str, err: UcumError) -> ValidationResult {
    let message = Message { severity: Severity::Fatal, text: err.to_string(), span: err.span() };
    let suggestions = suggestions_for(expression, &err);
    ValidationResult { valid: false, unit: None, messages: vec![message], suggestions }
}

#[cfg(feature = "suggestions")]
fn suggestions_for(expression: &str, err: &UcumError) -> Vec<String> {
    let atom = match err {
        UcumError::UnknownAtom { atom, .. } => atom.as_str(),
        _ => expression,
    };
    suggestions::suggest(atom)
}

#[cfg(not(feature = "suggestions"))]
fn suggestions_for(_expression: &str, _err: &UcumError) -> Vec<String> {
    Vec::new()
}

/// Convert `magnitude`, expressed in `from`, to its equivalent in `to`
/// (`spec.md` §4.6/§4.7). Both unit expressions are parsed in strict mode:
/// a converter input is expected to already be a syntactically valid,
/// known unit, not a candidate for error-tolerant correction.
pub fn convert(from: &str, magnitude: f64, to: &str, case_sensitive: bool) -> Result<ConversionResult, UcumError> {
    registry::init();
    let from_unit = get_specified_unit_strict(from, case_sensitive)?;
    let to_unit = get_specified_unit_strict(to, case_sensitive)?;
    let result = convert::convert(magnitude, &from_unit, &to_unit)?;
    Ok(ConversionResult { magnitude: result, messages: Vec::new() })
}

/// `spec.md` §4.6 `commensurables(u)`: every catalog atom code sharing the
/// dimension of the unit named by `expression`.
pub fn get_commensurables(expression: &str, case_sensitive: bool) -> Result<Vec<&'static str>, UcumError> {
    let unit = get_specified_unit_strict(expression, case_sensitive)?;
    Ok(convert::commensurables(&unit).into_iter().map(|record| record.code).collect())
}

/// Parse and evaluate `expression` strictly (no error-tolerant
/// corrections), returning `None` rather than propagating a parse error.
pub fn get_specified_unit(expression: &str, case_sensitive: bool) -> Option<UnitValue> {
    get_specified_unit_strict(expression, case_sensitive).ok()
}

fn get_specified_unit_strict(expression: &str, case_sensitive: bool) -> Result<UnitValue, UcumError> {
    registry::init();
    parse_and_evaluate(expression, case_sensitive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_kg_m_per_s2_is_force() {
        let result = validate("kg.m/s2", true);
        assert!(result.valid);
        let unit = result.unit.unwrap();
        assert_eq!(unit.dimension, Dimension::new([1, 1, -2, 0, 0, 0, 0]));
        assert_eq!(unit.magnitude, 1000.0);
    }

    #[test]
    fn convert_celsius_to_fahrenheit() {
        let result = convert("Cel", 37.0, "[degF]", true).unwrap();
        assert!((result.magnitude - 98.6).abs() < 1e-9);
    }

    #[test]
    fn convert_rejects_incommensurable_units() {
        let err = convert("mmol/L", 5.0, "g/L", true).unwrap_err();
        assert_eq!(err.code(), "IncommensurableUnits");
    }

    #[test]
    fn validate_reports_missing_dot_correction() {
        let result = validate("2mg", true);
        assert!(result.valid);
        assert!(result.messages.iter().any(|m| m.severity == Severity::Warning));
    }

    #[test]
    fn validate_reports_reordered_annotation_correction() {
        let result = validate("{creatine}mol", true);
        assert!(result.valid);
        assert!(result.messages.iter().any(|m| m.text.contains("reordered_annotation")));
    }

    #[test]
    fn validate_reports_brace_for_bracket_hint() {
        let result = validate("{degF}", true);
        assert!(result.valid);
        assert!(result.messages.iter().any(|m| m.text.contains("brace_for_bracket")));
    }

    #[test]
    fn convert_inches_to_feet() {
        let result = convert("[in_i]", 12.0, "[ft_i]", true).unwrap();
        assert!((result.magnitude - 1.0).abs() < 1e-9);
    }

    #[test]
    fn validate_leading_solidus() {
        let result = validate("/s", true);
        assert!(result.valid);
        assert_eq!(result.unit.unwrap().dimension, Dimension::new([0, 0, -1, 0, 0, 0, 0]));
    }

    #[test]
    fn whitespace_is_rejected() {
        let result = validate("kg m", true);
        assert!(!result.valid);
        assert_eq!(result.messages[0].severity, Severity::Fatal);
    }

    #[test]
    fn get_commensurables_shares_dimension() {
        let codes = get_commensurables("m", true).unwrap();
        assert!(codes.contains(&"m"));
    }

    #[test]
    fn get_specified_unit_returns_none_on_parse_failure() {
        assert!(get_specified_unit("not a unit", true).is_none());
    }
}
