//! Unit-value arithmetic: multiply, divide, invert, and raise to a power
//! (`spec.md` §4.5).
//!
//! Every operation here works over [`UnitValue`]'s dimension vector and
//! magnitude. Special (non-ratio) units reject every one of these
//! operations outright — `spec.md` §4.5's non-ratio guard — since `Cel`,
//! `pH`, and friends have no well-defined product or power.

use crate::error::UcumError;
use crate::types::{SpecialKind, UnitValue};

fn guard_ratio(value: &UnitValue, operation: &str) -> Result<(), UcumError> {
    if value.is_special() {
        Err(UcumError::non_ratio(display_name(value), operation))
    } else {
        Ok(())
    }
}

/// `multiply` has one carve-out from the blanket non-ratio guard
/// (`spec.md` §4.5): a special unit may be multiplied by a dimensionless
/// ratio scalar, which scales `cnvPfx` rather than `magnitude` — this is
/// how a bare numeric factor in front of a special atom (e.g. the `2` in
/// a composed expression) folds into the unit instead of erroring.
pub fn multiply(a: &UnitValue, b: &UnitValue) -> Result<UnitValue, UcumError> {
    if a.is_special() || b.is_special() {
        return multiply_special(a, b);
    }
    Ok(UnitValue {
        magnitude: a.magnitude * b.magnitude,
        dimension: a.dimension.add(&b.dimension),
        special: SpecialKind::None,
        cnv_pfx: 1.0,
        name: compose_name(&[(display_name(a), 1), (display_name(b), 1)]),
        cs_code: compose_name(&[(a.cs_code.clone(), 1), (b.cs_code.clone(), 1)]),
        ci_code: compose_name(&[(a.ci_code.clone(), 1), (b.ci_code.clone(), 1)]),
        print_symbol: compose_name(&[(a.print_symbol.clone(), 1), (b.print_symbol.clone(), 1)]),
        property: "composed".to_string(),
        class: "composed".to_string(),
        is_metric: false,
    })
}

fn multiply_special(a: &UnitValue, b: &UnitValue) -> Result<UnitValue, UcumError> {
    if a.is_special() && !b.is_special() && b.dimension.is_zero() {
        let mut out = a.clone();
        out.cnv_pfx *= b.magnitude;
        return Ok(out);
    }
    if b.is_special() && !a.is_special() && a.dimension.is_zero() {
        let mut out = b.clone();
        out.cnv_pfx *= a.magnitude;
        return Ok(out);
    }
    let offender = if a.is_special() { a } else { b };
    Err(UcumError::non_ratio(display_name(offender), "multiplication"))
}

pub fn divide(a: &UnitValue, b: &UnitValue) -> Result<UnitValue, UcumError> {
    guard_ratio(a, "division")?;
    guard_ratio(b, "division")?;
    if b.magnitude == 0.0 {
        return Err(UcumError::domain("division by a zero-magnitude unit"));
    }
    Ok(UnitValue {
        magnitude: a.magnitude / b.magnitude,
        dimension: a.dimension.sub(&b.dimension),
        special: SpecialKind::None,
        cnv_pfx: 1.0,
        name: compose_name(&[(display_name(a), 1), (display_name(b), -1)]),
        cs_code: compose_name(&[(a.cs_code.clone(), 1), (b.cs_code.clone(), -1)]),
        ci_code: compose_name(&[(a.ci_code.clone(), 1), (b.ci_code.clone(), -1)]),
        print_symbol: compose_name(&[(a.print_symbol.clone(), 1), (b.print_symbol.clone(), -1)]),
        property: "composed".to_string(),
        class: "composed".to_string(),
        is_metric: false,
    })
}

pub fn invert(a: &UnitValue) -> Result<UnitValue, UcumError> {
    guard_ratio(a, "inversion")?;
    if a.magnitude == 0.0 {
        return Err(UcumError::domain("inversion of a zero-magnitude unit"));
    }
    Ok(UnitValue {
        magnitude: 1.0 / a.magnitude,
        dimension: a.dimension.negate(),
        special: SpecialKind::None,
        cnv_pfx: 1.0,
        name: compose_name(&[(display_name(a), -1)]),
        cs_code: compose_name(&[(a.cs_code.clone(), -1)]),
        ci_code: compose_name(&[(a.ci_code.clone(), -1)]),
        print_symbol: compose_name(&[(a.print_symbol.clone(), -1)]),
        property: "composed".to_string(),
        class: "composed".to_string(),
        is_metric: false,
    })
}

pub fn power(a: &UnitValue, exponent: i32) -> Result<UnitValue, UcumError> {
    guard_ratio(a, "exponentiation")?;
    if exponent == 0 {
        return Ok(UnitValue::unity());
    }
    let magnitude = a.magnitude.powi(exponent);
    if !magnitude.is_finite() {
        return Err(UcumError::overflow("raising a unit to a power"));
    }
    Ok(UnitValue {
        magnitude,
        dimension: a.dimension.scale(exponent),
        special: SpecialKind::None,
        cnv_pfx: 1.0,
        name: compose_name(&[(display_name(a), exponent)]),
        cs_code: compose_name(&[(a.cs_code.clone(), exponent)]),
        ci_code: compose_name(&[(a.ci_code.clone(), exponent)]),
        print_symbol: compose_name(&[(a.print_symbol.clone(), exponent)]),
        property: "composed".to_string(),
        class: "composed".to_string(),
        is_metric: false,
    })
}

fn display_name(v: &UnitValue) -> String {
    if v.name.is_empty() {
        v.cs_code.clone()
    } else {
        v.name.clone()
    }
}

/// Composed-unit name format chosen for this crate: `name1^e1.name2^e2…`,
/// with `^e` omitted entirely when `e == 1` and the sign kept for negative
/// exponents (`spec.md` §9 design note on composed-name formatting).
pub fn compose_name(parts: &[(String, i32)]) -> String {
    parts
        .iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, exp)| if *exp == 1 { name.clone() } else { format!("{name}^{exp}") })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dimension;

    fn meter() -> UnitValue {
        let mut v = UnitValue::unity();
        v.magnitude = 1.0;
        v.dimension = Dimension::new([0, 1, 0, 0, 0, 0, 0]);
        v.cs_code = "m".to_string();
        v
    }

    fn second() -> UnitValue {
        let mut v = UnitValue::unity();
        v.magnitude = 1.0;
        v.dimension = Dimension::new([0, 0, 1, 0, 0, 0, 0]);
        v.cs_code = "s".to_string();
        v
    }

    #[test]
    fn multiply_adds_dimensions() {
        let product = multiply(&meter(), &second()).unwrap();
        assert_eq!(product.dimension, Dimension::new([0, 1, 1, 0, 0, 0, 0]));
        assert_eq!(product.cs_code, "m.s");
    }

    #[test]
    fn divide_subtracts_dimensions() {
        let quotient = divide(&meter(), &second()).unwrap();
        assert_eq!(quotient.dimension, Dimension::new([0, 1, -1, 0, 0, 0, 0]));
        assert_eq!(quotient.cs_code, "m.s^-1");
    }

    #[test]
    fn power_scales_dimension_and_omits_caret_for_one() {
        let squared = power(&meter(), 2).unwrap();
        assert_eq!(squared.dimension, Dimension::new([0, 2, 0, 0, 0, 0, 0]));
        assert_eq!(squared.cs_code, "m^2");

        let identity = power(&meter(), 1).unwrap();
        assert_eq!(identity.cs_code, "m");
    }

    #[test]
    fn special_units_reject_arithmetic() {
        let mut celsius = UnitValue::unity();
        celsius.special = SpecialKind::Celsius;
        let err = multiply(&celsius, &meter()).unwrap_err();
        assert_eq!(err.code(), "NonRatioOperation");
    }
}
