//! Error-code taxonomy coverage (`spec.md` §6/§7): one test per canonical
//! error code, asserting both the code string and that a span is attached
//! where the spec requires one.

use ucum_core::{get_specified_unit, validate};

#[test]
fn invalid_syntax_on_unbalanced_bracket() {
    let result = validate("[in_i", true);
    assert!(!result.valid);
    assert_eq!(result.messages[0].text.contains("unbalanced"), true);
}

#[test]
fn unknown_atom_reports_span() {
    let result = validate("furlong", true);
    assert!(!result.valid);
    assert!(result.messages[0].span.is_some());
}

#[test]
fn unknown_prefix_on_binary_prefixed_special_unit() {
    let result = validate("KiCel", true);
    assert!(!result.valid);
}

#[test]
fn incommensurable_units_on_convert() {
    let err = ucum_core::convert("m", 1.0, "s", true).unwrap_err();
    assert_eq!(err.code(), "IncommensurableUnits");
}

#[test]
fn non_ratio_operation_on_special_times_dimensioned() {
    let result = validate("Cel.m", true);
    assert!(!result.valid);
    assert_eq!(result.messages[0].text.contains("non-ratio"), true);
}

#[test]
fn domain_error_below_absolute_zero() {
    let err = ucum_core::convert("Cel", -300.0, "K", true).unwrap_err();
    assert_eq!(err.code(), "DomainError");
}

#[test]
fn overflow_on_extreme_power() {
    // km's magnitude is 1000; raised to a large enough power it exceeds
    // f64's finite range.
    let result = validate("km^1000", true);
    assert!(!result.valid);
    assert_eq!(result.messages[0].text.contains("overflow"), true);
}

#[test]
fn empty_input_is_rejected() {
    let result = validate("", true);
    assert!(!result.valid);
    assert_eq!(result.messages[0].text.contains("empty"), true);
}

#[test]
fn disallowed_whitespace_reports_position() {
    let result = validate("kg m", true);
    assert!(!result.valid);
    assert_eq!(result.messages[0].span.unwrap().start, 2);
}

#[test]
fn get_specified_unit_is_none_for_unknown_atom() {
    assert!(get_specified_unit("notaunit", true).is_none());
}
