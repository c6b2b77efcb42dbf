//! Dimensional compatibility check and ratio/non-ratio conversion
//! (`spec.md` §4.6).
//!
//! Every conversion — ratio-to-ratio, special-to-any, any-to-special, or
//! special-to-special — goes through the same two-step "coherent
//! intermediate value" computation: `from` converts its magnitude to the
//! coherent base-unit scale, then `to` converts that coherent value back
//! out to its own scale. This also resolves the `spec.md` §9 design note
//! about the source's `cnv_ == null` dereference bug: the non-special
//! branch here simply multiplies/divides by `magnitude` and never touches
//! a conversion function at all.

use crate::error::UcumError;
use crate::registry;
use crate::special_units;
use crate::types::Dimension;
use crate::types::UnitRecord;
use crate::types::UnitValue;

/// Convert `magnitude`, expressed in `from`, to its equivalent in `to`.
pub fn convert(magnitude: f64, from: &UnitValue, to: &UnitValue) -> Result<f64, UcumError> {
    if from.dimension != to.dimension {
        return Err(UcumError::incommensurable(display_name(from), display_name(to)));
    }

    let coherent = to_coherent(magnitude, from)?;
    from_coherent(coherent, to)
}

/// Step 2/3 of `spec.md` §4.6: map a value expressed in `unit` to the
/// coherent base-unit scale.
fn to_coherent(magnitude: f64, unit: &UnitValue) -> Result<f64, UcumError> {
    if unit.is_special() {
        special_units::to_coherent(unit.special, magnitude, unit.cnv_pfx, unit.magnitude)
    } else {
        let coherent = magnitude * unit.magnitude;
        if !coherent.is_finite() {
            return Err(UcumError::overflow("conversion to coherent form"));
        }
        Ok(coherent)
    }
}

/// Step 4 of `spec.md` §4.6: map a coherent base-unit value back out to
/// `unit`'s own scale.
fn from_coherent(coherent: f64, unit: &UnitValue) -> Result<f64, UcumError> {
    if unit.is_special() {
        special_units::from_coherent(unit.special, coherent, unit.cnv_pfx, unit.magnitude)
    } else {
        if unit.magnitude == 0.0 {
            return Err(UcumError::domain("conversion target has zero magnitude"));
        }
        let value = coherent / unit.magnitude;
        if !value.is_finite() {
            return Err(UcumError::overflow("conversion from coherent form"));
        }
        Ok(value)
    }
}

/// `spec.md` §4.6 `commensurables(u)`: every catalog atom sharing `u`'s
/// dimension, used by callers to drive UI hints/autocomplete. The
/// dimension's own coherent base unit, if one exists, is listed first —
/// callers presenting a unit picker want the canonical SI-style choice
/// up front rather than wherever it happens to fall in catalog order.
pub fn commensurables(u: &UnitValue) -> Vec<&'static UnitRecord> {
    let mut found: Vec<&'static UnitRecord> =
        registry::all_units().iter().filter(|record| record.dim == u.dimension).collect();

    if let Some(axis) = single_nonzero_axis(&u.dimension) {
        if let Ok(base) = registry::base_unit_for_dim(axis) {
            if let Some(pos) = found.iter().position(|r| r.code == base.code) {
                found.swap(0, pos);
            }
        }
    }
    found
}

/// `Some(axis)` when `dim` is a pure, first-power single axis (e.g. plain
/// length or plain mass), the only shape [`registry::base_unit_for_dim`]
/// has an answer for; composed dimensions (force, pressure, ...) have no
/// single coherent base atom to front-load.
fn single_nonzero_axis(dim: &Dimension) -> Option<usize> {
    let mut axis = None;
    for (i, &component) in dim.0.iter().enumerate() {
        if component == 0 {
            continue;
        }
        if component != 1 || axis.is_some() {
            return None;
        }
        axis = Some(i);
    }
    axis
}

fn display_name(v: &UnitValue) -> String {
    if v.cs_code.is_empty() {
        v.name.clone()
    } else {
        v.cs_code.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator;
    use crate::parser;

    fn unit(code: &str) -> UnitValue {
        let parsed = parser::parse_strict(code, true).unwrap();
        evaluator::evaluate(&parsed, true).unwrap()
    }

    #[test]
    fn ratio_to_ratio_scales_by_magnitude_ratio() {
        let from = unit("km");
        let to = unit("m");
        let result = convert(1.0, &from, &to).unwrap();
        assert!((result - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn identity_conversion_is_exact() {
        let u = unit("m");
        assert_eq!(convert(42.0, &u, &u).unwrap(), 42.0);
    }

    #[test]
    fn incommensurable_dimensions_are_rejected() {
        let from = unit("mol");
        let to = unit("g");
        let err = convert(5.0, &from, &to).unwrap_err();
        assert_eq!(err.code(), "IncommensurableUnits");
    }

    #[test]
    fn celsius_to_fahrenheit() {
        let from = unit("Cel");
        let to = unit("[degF]");
        let result = convert(37.0, &from, &to).unwrap();
        assert!((result - 98.6).abs() < 1e-9);
    }

    #[test]
    fn round_trip_within_relative_tolerance() {
        let from = unit("km");
        let to = unit("[ft_i]");
        let forward = convert(3.0, &from, &to).unwrap();
        let back = convert(forward, &to, &from).unwrap();
        assert!(((back - 3.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn commensurables_share_dimension() {
        let u = unit("m");
        let found = commensurables(&u);
        assert!(found.iter().any(|r| r.code == "m"));
        assert!(found.iter().all(|r| r.dim == u.dimension));
    }
}
