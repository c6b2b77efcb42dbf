//! The intermediate expression tree the parser builds before the
//! evaluator folds it into a [`crate::types::UnitValue`].

use crate::error::Span;
use std::fmt;

/// A parsed UCUM expression, prior to dimensional/magnitude evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitExpr {
    /// A bare numeric literal (`spec.md` §4.4 "number").
    Numeric(f64),
    /// An atom token, with any trailing `{annotation}` already stripped
    /// (annotations are tracked separately; see `Annotated`). The span
    /// covers the symbol text only, so `UnknownAtom` and the correction
    /// rules in `parser::corrections` can point at the offending token.
    Symbol(String, Span),
    /// `expr` annotated with the inert text between `{` and `}`.
    Annotated(Box<UnitExpr>, String),
    /// A left-to-right product of factors (`a.b.c`).
    Product(Vec<UnitFactor>),
    /// `numerator / denominator`.
    Quotient(Box<UnitExpr>, Box<UnitExpr>),
    /// `base ^ exponent`.
    Power(Box<UnitExpr>, i32),
    /// A logarithmic/special atom immediately followed by a bracketed
    /// reference expression with no operator between them, e.g.
    /// `B[10.nV]`. `base_symbol` is the special-unit atom code; `reference`
    /// is the parsed interior of the brackets, evaluated as its own
    /// sub-expression to obtain the reference quantity the level is taken
    /// relative to. Only reached when the atom-plus-bracket concatenation
    /// is not itself a known literal atom code (`B[SPL]` is looked up
    /// directly as a `Symbol` instead; see `parser::parse_component`).
    LogRef(String, Span, Box<UnitExpr>),
}

/// One element of a [`UnitExpr::Product`]: a sub-expression together with
/// the exponent already folded in by the parser for display purposes.
/// (Dimensional folding of the exponent happens in the evaluator; this
/// struct exists so the parser can build a flat factor list without
/// nesting a `Power` node for every exponentiated factor.)
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFactor {
    pub expr: UnitExpr,
    pub exponent: i32,
}

impl fmt::Display for UnitExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitExpr::Numeric(n) => write!(f, "{n}"),
            UnitExpr::Symbol(s, _) => write!(f, "{s}"),
            UnitExpr::Annotated(inner, text) => write!(f, "{inner}{{{text}}}"),
            UnitExpr::Product(factors) => {
                let parts: Vec<String> = factors.iter().map(|fac| fac.to_string()).collect();
                write!(f, "{}", parts.join("."))
            }
            UnitExpr::Quotient(num, den) => write!(f, "{num}/{den}"),
            UnitExpr::Power(base, exp) => write!(f, "{base}{exp}"),
            UnitExpr::LogRef(base, _, reference) => write!(f, "{base}[{reference}]"),
        }
    }
}

impl fmt::Display for UnitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent == 1 {
            write!(f, "{}", self.expr)
        } else {
            write!(f, "{}{}", self.expr, self.exponent)
        }
    }
}
