//! Non-ratio (special) unit conversion functions (`spec.md` §3, §9).
//!
//! Special units do not convert by a plain magnitude multiplication; they
//! carry a tagged [`crate::types::SpecialKind`] and convert through an
//! explicit forward/inverse pair of `f64` closures instead. `to_coherent`
//! maps a value expressed in the special unit to the coherent unit it is
//! defined against (e.g. kelvin for `Cel`); `from_coherent` is its inverse.
//!
//! Every function here is pure and total except where the underlying math
//! itself has a domain restriction (negative-argument logarithms, below
//! absolute zero); those report [`UcumError::DomainError`] rather than
//! producing `NaN`/`inf`.

use crate::error::UcumError;
use crate::types::SpecialKind;

const ABSOLUTE_ZERO_KELVIN: f64 = 0.0;

/// `x` is the value expressed in the special unit; `cnv_pfx` and
/// `magnitude` come from the unit's catalog record. Returns the equivalent
/// value in the coherent unit the special unit is defined against.
///
/// `magnitude` is applied *after* `f_from`, per `spec.md` §4.6 step 3
/// (`f_from(magnitude × cnvPfx) × magnitude`) — for `Cel` that factor is
/// `1` since its function already produces kelvin directly, but for
/// `[degF]` the catalog's `magnitude` (`5/9`) carries the Fahrenheit-degree
/// size and `f_from` only performs the Rankine-scale shift; multiplying
/// the two together is what produces kelvin.
pub fn to_coherent(kind: SpecialKind, x: f64, cnv_pfx: f64, magnitude: f64) -> Result<f64, UcumError> {
    let arg = x / cnv_pfx;
    let coherent = f_from(kind, arg)? * magnitude;
    if !coherent.is_finite() {
        return Err(UcumError::overflow("special unit conversion to coherent form"));
    }
    check_temperature_domain(kind, coherent, x)?;
    Ok(coherent)
}

/// Inverse of [`to_coherent`]: `y` is a value already expressed in the
/// coherent unit; returns its equivalent in the special unit.
pub fn from_coherent(kind: SpecialKind, y: f64, cnv_pfx: f64, magnitude: f64) -> Result<f64, UcumError> {
    check_temperature_domain(kind, y, y)?;
    let arg = y / magnitude;
    let special = f_to(kind, arg)? * cnv_pfx;
    if !special.is_finite() {
        return Err(UcumError::overflow("special unit conversion from coherent form"));
    }
    Ok(special)
}

/// Celsius and Fahrenheit are both ultimately anchored to kelvin; reject
/// anything that would put the coherent value below absolute zero.
fn check_temperature_domain(kind: SpecialKind, coherent_kelvin: f64, original: f64) -> Result<(), UcumError> {
    if matches!(kind, SpecialKind::Celsius | SpecialKind::Fahrenheit) && coherent_kelvin < ABSOLUTE_ZERO_KELVIN {
        return Err(UcumError::domain(format!("{original} is below absolute zero")));
    }
    Ok(())
}

/// Forward function: special-unit argument -> coherent-unit value (before
/// `magnitude` is applied by the caller).
fn f_from(kind: SpecialKind, x: f64) -> Result<f64, UcumError> {
    match kind {
        SpecialKind::None => Ok(x),
        // Cel's magnitude is 1, so this result is already kelvin.
        SpecialKind::Celsius => Ok(x + 273.15),
        // Rankine-scale shift only; the catalog's magnitude (5/9) supplies
        // the Fahrenheit-to-kelvin degree-size factor.
        SpecialKind::Fahrenheit => Ok(x + 459.67),
        // Natural-log bel (neper family): x = ln(y) => y = e^x.
        SpecialKind::LnBel => Ok(x.exp()),
        // Base-10-log bel: x = log10(y) => y = 10^x.
        SpecialKind::Log10Bel => Ok(10f64.powf(x)),
        // Amplitude-ratio bel (e.g. sound pressure level): x = 2.log10(y).
        SpecialKind::Log2Bel => Ok(10f64.powf(x / 2.0)),
        // Binary logarithm: x = log2(y) => y = 2^x.
        SpecialKind::Ld => Ok(2f64.powf(x)),
        // Prism diopter: x = 100.tan(theta) => theta = atan(x/100).
        SpecialKind::Tan100 => Ok((x / 100.0).atan()),
        // pH: x = -log10(y) => y = 10^-x.
        SpecialKind::PH => Ok(10f64.powf(-x)),
    }
}

/// Inverse function: coherent-unit value -> special-unit argument (after
/// `magnitude` has already been divided out by the caller).
fn f_to(kind: SpecialKind, y: f64) -> Result<f64, UcumError> {
    match kind {
        SpecialKind::None => Ok(y),
        SpecialKind::Celsius => Ok(y - 273.15),
        SpecialKind::Fahrenheit => Ok(y - 459.67),
        SpecialKind::LnBel => {
            require_positive(y, "Np")?;
            Ok(y.ln())
        }
        SpecialKind::Log10Bel => {
            require_positive(y, "B")?;
            Ok(y.log10())
        }
        SpecialKind::Log2Bel => {
            require_positive(y, "B[SPL]-style amplitude ratio")?;
            Ok(2.0 * y.log10())
        }
        SpecialKind::Ld => {
            require_positive(y, "bit logarithm")?;
            Ok(y.log2())
        }
        SpecialKind::Tan100 => Ok(100.0 * y.tan()),
        SpecialKind::PH => {
            require_positive(y, "pH")?;
            Ok(-y.log10())
        }
    }
}

fn require_positive(y: f64, what: &str) -> Result<(), UcumError> {
    if y <= 0.0 {
        Err(UcumError::domain(format!("{what} requires a strictly positive argument, got {y}")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_round_trips() {
        let k = to_coherent(SpecialKind::Celsius, 0.0, 1.0, 1.0).unwrap();
        assert!((k - 273.15).abs() < 1e-9);
        let c = from_coherent(SpecialKind::Celsius, k, 1.0, 1.0).unwrap();
        assert!(c.abs() < 1e-9);
    }

    #[test]
    fn fahrenheit_freezing_point() {
        // magnitude = 5/9, matching the catalog's [degF] record: f_from
        // performs the Rankine-scale shift, magnitude supplies the
        // degree-size factor.
        let k = to_coherent(SpecialKind::Fahrenheit, 32.0, 1.0, 5.0 / 9.0).unwrap();
        assert!((k - 273.15).abs() < 1e-6);
    }

    #[test]
    fn fahrenheit_round_trips_through_catalog_magnitude() {
        let k = to_coherent(SpecialKind::Fahrenheit, 98.6, 1.0, 5.0 / 9.0).unwrap();
        let back = from_coherent(SpecialKind::Fahrenheit, k, 1.0, 5.0 / 9.0).unwrap();
        assert!((back - 98.6).abs() < 1e-9);
    }

    #[test]
    fn celsius_below_absolute_zero_is_domain_error() {
        let err = to_coherent(SpecialKind::Celsius, -300.0, 1.0, 1.0).unwrap_err();
        assert_eq!(err.code(), "DomainError");
    }

    #[test]
    fn log10_bel_round_trips() {
        let coherent = to_coherent(SpecialKind::Log10Bel, 2.0, 1.0, 1.0).unwrap();
        assert!((coherent - 100.0).abs() < 1e-9);
        let back = from_coherent(SpecialKind::Log10Bel, coherent, 1.0, 1.0).unwrap();
        assert!((back - 2.0).abs() < 1e-9);
    }

    #[test]
    fn ph_requires_positive_argument() {
        let err = from_coherent(SpecialKind::PH, -1.0, 1.0, 1.0).unwrap_err();
        assert_eq!(err.code(), "DomainError");
    }
}
