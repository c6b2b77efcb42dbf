//! The crate's single error type and the nine canonical error codes from
//! `spec.md` §6/§7.

use thiserror::Error;

/// A half-open `[start, end)` byte range into the original expression,
/// used to point diagnostics at the offending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn point(pos: usize) -> Self {
        Span { start: pos, end: pos + 1 }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let end = self.end.min(source.len());
        let start = self.start.min(end);
        &source[start..end]
    }
}

/// The crate's error type. Every variant corresponds to exactly one of the
/// error codes enumerated in `spec.md` §6.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UcumError {
    #[error("invalid syntax at {span:?}: {reason}")]
    InvalidSyntax { reason: String, span: Option<Span> },

    #[error("unknown atom '{atom}'")]
    UnknownAtom { atom: String, span: Option<Span> },

    #[error("unknown prefix '{prefix}'")]
    UnknownPrefix { prefix: String, span: Option<Span> },

    #[error("incommensurable units: '{from}' and '{to}' do not share a dimension")]
    IncommensurableUnits { from: String, to: String },

    #[error("non-ratio operation: {operation} is not defined for special unit '{unit}'")]
    NonRatioOperation { unit: String, operation: String },

    #[error("domain error: {reason}")]
    DomainError { reason: String },

    #[error("overflow while computing {operation}")]
    Overflow { operation: String },

    #[error("empty input")]
    EmptyInput,

    #[error("disallowed whitespace at position {position}")]
    DisallowedWhitespace { position: usize },
}

impl UcumError {
    /// The stable string identifier from `spec.md` §6's error-code list.
    pub fn code(&self) -> &'static str {
        match self {
            UcumError::InvalidSyntax { .. } => "InvalidSyntax",
            UcumError::UnknownAtom { .. } => "UnknownAtom",
            UcumError::UnknownPrefix { .. } => "UnknownPrefix",
            UcumError::IncommensurableUnits { .. } => "IncommensurableUnits",
            UcumError::NonRatioOperation { .. } => "NonRatioOperation",
            UcumError::DomainError { .. } => "DomainError",
            UcumError::Overflow { .. } => "Overflow",
            UcumError::EmptyInput => "EmptyInput",
            UcumError::DisallowedWhitespace { .. } => "DisallowedWhitespace",
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            UcumError::InvalidSyntax { span, .. } => *span,
            UcumError::UnknownAtom { span, .. } => *span,
            UcumError::UnknownPrefix { span, .. } => *span,
            UcumError::DisallowedWhitespace { position } => Some(Span::point(*position)),
            _ => None,
        }
    }

    pub fn invalid_syntax(reason: impl Into<String>, span: Option<Span>) -> Self {
        UcumError::InvalidSyntax { reason: reason.into(), span }
    }

    pub fn unknown_atom(atom: impl Into<String>, span: Option<Span>) -> Self {
        UcumError::UnknownAtom { atom: atom.into(), span }
    }

    pub fn unknown_prefix(prefix: impl Into<String>, span: Option<Span>) -> Self {
        UcumError::UnknownPrefix { prefix: prefix.into(), span }
    }

    pub fn incommensurable(from: impl Into<String>, to: impl Into<String>) -> Self {
        UcumError::IncommensurableUnits { from: from.into(), to: to.into() }
    }

    pub fn non_ratio(unit: impl Into<String>, operation: impl Into<String>) -> Self {
        UcumError::NonRatioOperation { unit: unit.into(), operation: operation.into() }
    }

    pub fn domain(reason: impl Into<String>) -> Self {
        UcumError::DomainError { reason: reason.into() }
    }

    pub fn overflow(operation: impl Into<String>) -> Self {
        UcumError::Overflow { operation: operation.into() }
    }
}
