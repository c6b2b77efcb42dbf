//! The catalog: loaded-once, read-only registries of prefixes and atomic
//! units (`spec.md` §4.1).
//!
//! `build.rs` parses `data/ucum_catalog.json` and emits a Rust source file
//! containing two `&'static` slices, `PREFIXES` and `UNITS`, which are
//! included here. The rest of the crate never touches the generated file
//! directly; it goes through the lookup functions below, which is also
//! where the process-wide `init()` idempotency lives.

use crate::error::UcumError;
use crate::types::{Prefix, UnitRecord};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::OnceLock;

include!(env!("UCUM_REGISTRY"));

/// Case-sensitive and case-insensitive code indices over `UNITS`, built
/// once on first lookup. The catalog is small enough that the original
/// linear scan was never a bottleneck, but an index map is the idiomatic
/// way to expose O(1) lookups over a `OnceLock`-published, append-only
/// table, and it costs nothing once warmed.
static UNITS_BY_CODE: Lazy<HashMap<&'static str, &'static UnitRecord>> =
    Lazy::new(|| UNITS.iter().map(|u| (u.code, u)).collect());
static UNITS_BY_CODE_CI: Lazy<HashMap<&'static str, &'static UnitRecord>> =
    Lazy::new(|| UNITS.iter().map(|u| (u.code_ci, u)).collect());
static PREFIXES_BY_CODE: Lazy<HashMap<&'static str, &'static Prefix>> =
    Lazy::new(|| PREFIXES.iter().map(|p| (p.code, p)).collect());
static PREFIXES_BY_CODE_CI: Lazy<HashMap<&'static str, &'static Prefix>> =
    Lazy::new(|| PREFIXES.iter().map(|p| (p.code_ci, p)).collect());

/// Opaque handle proving the catalog has been published. `spec.md` §5
/// calls for "an explicit, immutable catalog value... held behind a
/// process-wide initialized-once handle with safe publication"; this is
/// that handle. There is currently only one dataset (the one `build.rs`
/// embedded), so `Catalog` carries no fields — its only job is to exist
/// once `init` has run.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    _private: (),
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Idempotent catalog load (`spec.md` §6 `init(catalog_source)`).
///
/// The only dataset available to this process is the one embedded at
/// build time, so `init` ignores its nominal "which dataset" argument in
/// practice: a second call is always a no-op. (A real multi-dataset
/// deployment would compare the requested source against the published
/// one and error on mismatch, per `spec.md` §5; there is exactly one
/// source here, so that branch can never be taken.)
pub fn init() -> &'static Catalog {
    CATALOG.get_or_init(|| Catalog { _private: () })
}

/// Lookup a prefix by code. `case_sensitive=false` folds `code` to the
/// catalog's upper-cased canonical form before matching, per `spec.md`
/// §4.1's contract that the two registries are disjoint views.
pub fn prefix_by_code(code: &str, case_sensitive: bool) -> Option<&'static Prefix> {
    init();
    if case_sensitive {
        PREFIXES_BY_CODE.get(code).copied()
    } else {
        let folded = code.to_uppercase();
        PREFIXES_BY_CODE_CI.get(folded.as_str()).copied()
    }
}

pub fn atom_by_code(code: &str, case_sensitive: bool) -> Option<&'static UnitRecord> {
    init();
    if case_sensitive {
        UNITS_BY_CODE.get(code).copied()
    } else {
        let folded = code.to_uppercase();
        UNITS_BY_CODE_CI.get(folded.as_str()).copied()
    }
}

pub fn atom_by_name(name: &str) -> Option<&'static UnitRecord> {
    init();
    UNITS.iter().find(|u| u.name.eq_ignore_ascii_case(name))
}

pub fn atom_by_synonym(term: &str) -> Option<&'static UnitRecord> {
    init();
    UNITS
        .iter()
        .find(|u| u.synonyms.iter().any(|s| s.eq_ignore_ascii_case(term)))
}

/// The coherent base unit for dimension axis `i` (`spec.md` §4.1). Axis
/// order is `types::DIM_MASS..DIM_LUMINOUS`.
pub fn base_unit_for_dim(i: usize) -> Result<&'static UnitRecord, UcumError> {
    init();
    let mut target = crate::types::Dimension::ZERO;
    target.0[i] = 1;
    UNITS
        .iter()
        .find(|u| u.dim == target && u.magnitude == 1.0 && !u.is_special)
        .ok_or_else(|| UcumError::domain(format!("no coherent base unit for dimension axis {i}")))
}

pub fn all_units() -> &'static [UnitRecord] {
    init();
    UNITS
}

/// Longest-match prefix split: tries every prefix code (longest first) as
/// a candidate leading substring of `code`, returning the first split
/// whose remainder is itself a known, metric atom (`spec.md` §4.4 atom
/// resolution step 2).
pub fn split_prefixed_atom(
    code: &str,
    case_sensitive: bool,
) -> Option<(&'static Prefix, &'static UnitRecord)> {
    init();
    let mut candidates: Vec<&'static Prefix> = PREFIXES.iter().collect();
    candidates.sort_by_key(|p| std::cmp::Reverse(p.code.len()));

    for prefix in candidates {
        let prefix_code = if case_sensitive { prefix.code } else { prefix.code_ci };
        let haystack = if case_sensitive { code } else { &code.to_uppercase() };
        if haystack.len() <= prefix_code.len() || !haystack.starts_with(prefix_code) {
            continue;
        }
        let remainder = &code[prefix_code.len()..];
        if let Some(atom) = atom_by_code(remainder, case_sensitive) {
            if atom.is_metric {
                return Some((prefix, atom));
            }
        }
    }
    None
}
