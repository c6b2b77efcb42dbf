//! Suggestion engine for the validator façade (`spec.md` §4.7): "Suggestions
//! are produced only if parsing failed and the input differs from a known
//! atom by ≤1 edit or a known synonym rule."
//!
//! Gated behind the `suggestions` feature since it pulls in `fuzzy-matcher`
//! purely to rank candidates that pass the edit-distance gate — the gate
//! itself is a plain Levenshtein check, kept dependency-free so the core
//! validator logic never needs the feature.

use crate::registry;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Candidates within edit distance 1 of `invalid`, or matching one of its
/// registered synonyms, ranked by fuzzy-match score (best first). Returns
/// at most 5 codes.
pub fn suggest(invalid: &str) -> Vec<String> {
    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, &'static str)> = Vec::new();
    let synonym_hit = registry::atom_by_synonym(invalid);

    for unit in registry::all_units() {
        let within_edit_distance = edit_distance(invalid, unit.code) <= 1
            || (!unit.code_ci.is_empty() && edit_distance(&invalid.to_uppercase(), unit.code_ci) <= 1);
        let synonym_match = synonym_hit.is_some_and(|hit| hit.code == unit.code);

        if !within_edit_distance && !synonym_match {
            continue;
        }

        let score = matcher.fuzzy_match(unit.code, invalid).unwrap_or(0) + if synonym_match { 1000 } else { 0 };
        scored.push((score, unit.code));
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    let mut seen = std::collections::HashSet::new();
    scored
        .into_iter()
        .filter(|(_, code)| seen.insert(*code))
        .take(5)
        .map(|(_, code)| code.to_string())
        .collect()
}

/// Plain Levenshtein distance, used only for the ≤1-edit suggestion gate.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for i in 1..=a.len() {
        let mut prev = row[0];
        row[0] = i;
        for j in 1..=b.len() {
            let cur = row[j];
            row[j] = if a[i - 1] == b[j - 1] {
                prev
            } else {
                1 + prev.min(row[j]).min(row[j - 1])
            };
            prev = cur;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_single_edit_typo() {
        // "mm" is one insertion away from the catalog code "m"; "mm" is not
        // itself a catalog entry (it's prefix "m" + atom "m", resolved by
        // the evaluator's prefix-split, never a literal UNITS row), so the
        // suggestion engine — which only scans literal catalog codes — is
        // exercised against a typo of an actual entry.
        let suggestions = suggest("mm");
        assert!(suggestions.iter().any(|s| s == "m"));
    }

    #[test]
    fn suggests_known_synonym() {
        let suggestions = suggest("metre");
        assert!(suggestions.iter().any(|s| s == "m"));
    }

    #[test]
    fn unrelated_input_has_no_suggestions() {
        assert!(suggest("xyzzyplugh123").is_empty());
    }

    #[test]
    fn edit_distance_basic_cases() {
        assert_eq!(edit_distance("m", "m"), 0);
        assert_eq!(edit_distance("mm", "m"), 1);
        assert_eq!(edit_distance("kg", "g"), 1);
    }
}
