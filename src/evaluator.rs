//! Folds a parsed [`UnitExpr`] into a [`UnitValue`] (`spec.md` §4.4 atom
//! resolution, §4.5 arithmetic composition).
//!
//! This is the bridge between the syntax tree the parser builds and the
//! numeric/dimensional value the rest of the crate operates on. Atom
//! resolution (exact match, then prefix split) happens here rather than in
//! the parser, since it needs the catalog and the parser is catalog-free.

use crate::arithmetic;
use crate::ast::UnitExpr;
use crate::error::{Span, UcumError};
use crate::registry;
use crate::types::UnitValue;

/// Fold `expr` into a [`UnitValue`], resolving every atom against the
/// catalog along the way.
pub fn evaluate(expr: &UnitExpr, case_sensitive: bool) -> Result<UnitValue, UcumError> {
    match expr {
        UnitExpr::Numeric(n) => {
            let mut v = UnitValue::unity();
            v.magnitude = *n;
            Ok(v)
        }
        UnitExpr::Symbol(sym, span) => resolve_symbol(sym, case_sensitive, Some(*span)),
        UnitExpr::Annotated(inner, text) => {
            let inner_value = evaluate(inner, case_sensitive)?;
            Ok(append_annotation(inner_value, text))
        }
        UnitExpr::Product(factors) => {
            let mut acc = UnitValue::unity();
            for factor in factors {
                let mut value = evaluate(&factor.expr, case_sensitive)?;
                if factor.exponent != 1 {
                    value = arithmetic::power(&value, factor.exponent)?;
                }
                acc = arithmetic::multiply(&acc, &value)?;
            }
            Ok(acc)
        }
        UnitExpr::Quotient(num, den) => {
            let numerator = evaluate(num, case_sensitive)?;
            let denominator = evaluate(den, case_sensitive)?;
            arithmetic::divide(&numerator, &denominator)
        }
        UnitExpr::Power(base, exponent) => {
            let base_value = evaluate(base, case_sensitive)?;
            arithmetic::power(&base_value, *exponent)
        }
        UnitExpr::LogRef(base_symbol, span, reference) => {
            evaluate_log_ref(base_symbol, *span, reference, case_sensitive)
        }
    }
}

/// Atom resolution (`spec.md` §4.4): an exact catalog match wins outright;
/// failing that, the longest prefix whose remainder is a known metric atom
/// is tried. A binary prefix (`Ki`, `Mi`, ...) applied to a special atom is
/// rejected — binary prefixes only make sense on linearly-scaled ratio
/// units, never on a unit with its own conversion function.
fn resolve_symbol(sym: &str, case_sensitive: bool, span: Option<Span>) -> Result<UnitValue, UcumError> {
    if let Some(record) = registry::atom_by_code(sym, case_sensitive) {
        return Ok(UnitValue::from_record(record));
    }

    if let Some((prefix, atom)) = registry::split_prefixed_atom(sym, case_sensitive) {
        if atom.is_special && prefix.is_binary() {
            return Err(UcumError::unknown_prefix(
                format!("binary prefix '{}' cannot scale special unit '{}'", prefix.code, atom.code),
                span,
            ));
        }

        let mut value = UnitValue::from_record(atom);
        // A special unit's linear scale factor lives in cnvPfx, not
        // magnitude; a ratio unit's lives in magnitude directly.
        if atom.is_special {
            value.cnv_pfx *= prefix.factor;
        } else {
            value.magnitude *= prefix.factor;
        }
        value.cs_code = format!("{}{}", prefix.code, atom.code);
        value.ci_code = format!("{}{}", prefix.code_ci, atom.code_ci);
        value.print_symbol = format!("{}{}", prefix.code, atom.print_symbol);
        value.name = format!("{}{}", prefix.name, atom.name);
        return Ok(value);
    }

    if let Some(prefix) = registry::prefix_by_code(sym, case_sensitive) {
        return Err(UcumError::invalid_syntax(
            format!("'{sym}' is the prefix '{}' with no atom attached", prefix.name),
            span,
        ));
    }

    Err(UcumError::unknown_atom(sym, span))
}

/// `base[reference]` (e.g. `B[10.nV]`): a logarithmic atom applied to a
/// dynamically computed reference quantity instead of its catalog-fixed
/// one. `base_symbol` must name a special (logarithmic) unit; `reference`
/// is evaluated as an ordinary expression to get the quantity the level is
/// taken relative to.
///
/// This construct has no counterpart in the published UCUM tables — it is
/// this crate's extension for an explicit reference value. There is no
/// authoritative definition of what dimension/magnitude the result should
/// carry, so this implementation takes the pragmatic reading: the result
/// is a plain ratio unit whose magnitude and dimension equal the
/// reference's, with the logarithmic kind itself discarded. The base atom
/// is only consulted to confirm it is in fact a logarithmic unit.
fn evaluate_log_ref(
    base_symbol: &str,
    span: Span,
    reference: &UnitExpr,
    case_sensitive: bool,
) -> Result<UnitValue, UcumError> {
    let base = resolve_symbol(base_symbol, case_sensitive, Some(span))?;
    if !base.is_special() {
        return Err(UcumError::invalid_syntax(
            format!("'{base_symbol}' is not a logarithmic unit and cannot take a bracketed reference"),
            Some(span),
        ));
    }

    let mut value = evaluate(reference, case_sensitive)?;
    let composed = format!("{base_symbol}[{reference}]");
    value.name = composed.clone();
    value.cs_code = composed.clone();
    value.ci_code = composed.clone();
    value.print_symbol = composed;
    Ok(value)
}

fn append_annotation(mut value: UnitValue, text: &str) -> UnitValue {
    let suffix = format!("{{{text}}}");
    value.name.push_str(&suffix);
    value.cs_code.push_str(&suffix);
    value.ci_code.push_str(&suffix);
    value.print_symbol.push_str(&suffix);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn eval_str(input: &str) -> Result<UnitValue, UcumError> {
        let parsed = parser::parse_strict(input, true)?;
        evaluate(&parsed, true)
    }

    #[test]
    fn resolves_plain_atom() {
        let v = eval_str("m").unwrap();
        assert_eq!(v.cs_code, "m");
        assert_eq!(v.magnitude, 1.0);
    }

    #[test]
    fn resolves_prefixed_metric_atom() {
        let v = eval_str("km").unwrap();
        assert_eq!(v.magnitude, 1000.0);
        assert_eq!(v.cs_code, "km");
    }

    #[test]
    fn unknown_atom_reports_span() {
        let err = eval_str("bogus").unwrap_err();
        assert_eq!(err.code(), "UnknownAtom");
        assert_eq!(err.span(), Some(Span::new(0, 5)));
    }

    #[test]
    fn product_composes_dimension() {
        let v = eval_str("m.s").unwrap();
        assert_eq!(v.cs_code, "m.s");
    }

    #[test]
    fn quotient_divides() {
        let v = eval_str("m/s").unwrap();
        assert_eq!(v.cs_code, "m.s^-1");
    }

    #[test]
    fn annotation_is_inert_to_magnitude() {
        let plain = eval_str("m").unwrap();
        let annotated = eval_str("m{annotation text}").unwrap();
        assert_eq!(plain.magnitude, annotated.magnitude);
        assert_eq!(plain.dimension, annotated.dimension);
        assert!(annotated.cs_code.ends_with("{annotation text}"));
    }

    #[test]
    fn binary_prefix_on_special_unit_is_rejected() {
        let err = eval_str("KiCel").unwrap_err();
        assert_eq!(err.code(), "UnknownPrefix");
    }

    #[test]
    fn bare_prefix_with_no_atom_names_the_prefix() {
        let err = eval_str("da").unwrap_err();
        assert_eq!(err.code(), "InvalidSyntax");
        assert!(err.to_string().contains("prefix"));
    }
}
