//! Core data types: dimensions, prefixes, catalog records, and unit values.

use std::fmt;

/// Number of UCUM base dimensions tracked by [`Dimension`].
pub const DIM_LEN: usize = 7;

/// Default ceiling on `|exp|` for a base-10 prefix (`spec.md` §3/§6).
pub const MAX_PREFIX_EXPONENT: i32 = 24;

/// Axis order used by every [`Dimension`] in this process: mass, length,
/// time, plane angle, temperature, electric charge, luminous intensity.
///
/// This differs from the SI ordering (mass, length, time, current,
/// temperature, amount, luminous intensity) that UCUM implementations
/// conventionally use; the axis order here follows `spec.md` §3 exactly,
/// which is authoritative for this crate.
pub const DIM_MASS: usize = 0;
pub const DIM_LENGTH: usize = 1;
pub const DIM_TIME: usize = 2;
pub const DIM_PLANE_ANGLE: usize = 3;
pub const DIM_TEMPERATURE: usize = 4;
pub const DIM_CHARGE: usize = 5;
pub const DIM_LUMINOUS: usize = 6;

/// A fixed-width integer vector over the seven UCUM base dimensions.
///
/// Operations are componentwise; see `spec.md` §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension(pub [i8; DIM_LEN]);

impl Dimension {
    pub const ZERO: Dimension = Dimension([0; DIM_LEN]);

    pub const fn new(components: [i8; DIM_LEN]) -> Self {
        Dimension(components)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    #[must_use]
    pub fn add(&self, other: &Dimension) -> Dimension {
        let mut out = [0i8; DIM_LEN];
        for i in 0..DIM_LEN {
            out[i] = self.0[i] + other.0[i];
        }
        Dimension(out)
    }

    #[must_use]
    pub fn sub(&self, other: &Dimension) -> Dimension {
        let mut out = [0i8; DIM_LEN];
        for i in 0..DIM_LEN {
            out[i] = self.0[i] - other.0[i];
        }
        Dimension(out)
    }

    #[must_use]
    pub fn negate(&self) -> Dimension {
        let mut out = [0i8; DIM_LEN];
        for i in 0..DIM_LEN {
            out[i] = -self.0[i];
        }
        Dimension(out)
    }

    #[must_use]
    pub fn scale(&self, n: i32) -> Dimension {
        let mut out = [0i8; DIM_LEN];
        for i in 0..DIM_LEN {
            out[i] = (self.0[i] as i32 * n) as i8;
        }
        Dimension(out)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// A UCUM prefix, identified by case-sensitive and case-insensitive codes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prefix {
    pub code: &'static str,
    pub code_ci: &'static str,
    pub name: &'static str,
    /// Multiplicative factor (e.g. `1e3` for kilo, `1024.0` for kibi).
    pub factor: f64,
    /// `10` for decimal prefixes, `2` for binary prefixes.
    pub base: i32,
}

impl Prefix {
    pub fn is_binary(&self) -> bool {
        self.base == 2
    }
}

/// The tag identifying which built-in, non-ratio conversion function a
/// catalog unit uses. `None` means the unit is an ordinary ratio unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialKind {
    None,
    Celsius,
    Fahrenheit,
    /// Natural-log-based bel (neper family), UCUM `cnv="ln"`.
    LnBel,
    /// Base-10-log bel, UCUM `cnv="lg"`.
    Log10Bel,
    /// Base-2-log bel, UCUM `cnv="2lg"` (sound-level-style octave bel).
    Log2Bel,
    /// `cnv="ld"`, log base 2 (binary logarithm, e.g. `[bit_s]`).
    Ld,
    /// `cnv="tan"`, arbitrary-unit tangent-based scale (prism diopter).
    Tan100,
    /// `cnv="pH"`.
    PH,
}

impl SpecialKind {
    pub fn is_special(&self) -> bool {
        !matches!(self, SpecialKind::None)
    }

    pub fn from_tag(tag: &str) -> Option<SpecialKind> {
        Some(match tag {
            "Cel" => SpecialKind::Celsius,
            "degF" => SpecialKind::Fahrenheit,
            "ln" => SpecialKind::LnBel,
            "lg" => SpecialKind::Log10Bel,
            "2lg" => SpecialKind::Log2Bel,
            "ld" => SpecialKind::Ld,
            "tan" | "100tan" => SpecialKind::Tan100,
            "pH" => SpecialKind::PH,
            _ => return None,
        })
    }
}

/// A catalog-defined prefix-eligible or standalone unit atom.
///
/// This is the immutable, loaded-once record from `spec.md` §3's "Atomic
/// Unit". It is distinct from [`UnitValue`], which is the short-lived
/// result of parsing or arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitRecord {
    pub code: &'static str,
    pub code_ci: &'static str,
    pub name: &'static str,
    pub property: &'static str,
    pub print_symbol: &'static str,
    pub class: &'static str,
    pub is_metric: bool,
    pub is_special: bool,
    pub is_arbitrary: bool,
    pub magnitude: f64,
    pub dim: Dimension,
    pub special: SpecialKind,
    /// Conversion prefix (`cnvPfx`), applied inside the conversion function
    /// argument for special units. Defaults to `1.0`.
    pub cnv_pfx: f64,
    pub synonyms: &'static [&'static str],
}

/// The in-memory representation of a parsed or constructed unit
/// (`spec.md` §3 "Unit value").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitValue {
    pub magnitude: f64,
    pub dimension: Dimension,
    pub special: SpecialKind,
    pub cnv_pfx: f64,
    pub name: String,
    pub cs_code: String,
    pub ci_code: String,
    pub print_symbol: String,
    pub property: String,
    pub class: String,
    pub is_metric: bool,
}

impl UnitValue {
    /// The dimensionless unit "1": magnitude 1, zero dimension, no
    /// conversion function, `cnvPfx=1` (`spec.md` §3 invariant).
    pub fn unity() -> Self {
        UnitValue {
            magnitude: 1.0,
            dimension: Dimension::ZERO,
            special: SpecialKind::None,
            cnv_pfx: 1.0,
            name: String::new(),
            cs_code: String::new(),
            ci_code: String::new(),
            print_symbol: String::new(),
            property: "dimless".to_string(),
            class: "dimless".to_string(),
            is_metric: false,
        }
    }

    pub fn is_special(&self) -> bool {
        self.special.is_special()
    }

    pub fn from_record(record: &UnitRecord) -> Self {
        UnitValue {
            magnitude: record.magnitude,
            dimension: record.dim,
            special: record.special,
            cnv_pfx: record.cnv_pfx,
            name: record.name.to_string(),
            cs_code: record.code.to_string(),
            ci_code: record.code_ci.to_string(),
            print_symbol: record.print_symbol.to_string(),
            property: record.property.to_string(),
            class: record.class.to_string(),
            is_metric: record.is_metric,
        }
    }
}
