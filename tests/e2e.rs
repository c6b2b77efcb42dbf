//! The eight literal end-to-end scenarios and the testable-properties laws
//! from `spec.md` §8.

use ucum_core::{convert, get_specified_unit, validate, Dimension};

#[test]
fn scenario_1_kg_m_per_s2_is_force() {
    let result = validate("kg.m/s2", true);
    assert!(result.valid);
    let unit = result.unit.unwrap();
    assert_eq!(unit.dimension, Dimension::new([1, 1, -2, 0, 0, 0, 0]));
    assert_eq!(unit.magnitude, 1000.0);
}

#[test]
fn scenario_2_celsius_to_fahrenheit() {
    let result = convert("Cel", 37.0, "[degF]", true).unwrap();
    assert!((result.magnitude - 98.6).abs() < 1e-9);
}

#[test]
fn scenario_3_mmol_per_l_to_g_per_l_is_incommensurable() {
    let err = convert("mmol/L", 5.0, "g/L", true).unwrap_err();
    assert_eq!(err.code(), "IncommensurableUnits");
}

#[test]
fn scenario_4_missing_dot_is_corrected() {
    let result = validate("2mg", true);
    assert!(result.valid);
    assert_eq!(result.messages.len(), 1);
    assert!(result.messages[0].text.contains("missing_dot"));
}

#[test]
fn scenario_5_reordered_annotation_is_corrected() {
    let result = validate("{creatine}mol", true);
    assert!(result.valid);
    assert!(result.messages[0].text.contains("reordered_annotation"));
}

#[test]
fn scenario_6_inches_to_feet_is_exact() {
    let result = convert("[in_i]", 12.0, "[ft_i]", true).unwrap();
    assert_eq!(result.magnitude, 1.0);
}

#[test]
fn scenario_7_bel_with_reference_and_prefix() {
    let result = convert("B[10.nV]", 1.0, "V", true).unwrap();
    assert!((result.magnitude - 1e-8).abs() < 1e-15);
}

#[test]
fn scenario_8_leading_solidus() {
    let result = validate("/s", true);
    assert!(result.valid);
    assert_eq!(result.unit.unwrap().dimension, Dimension::new([0, 0, -1, 0, 0, 0, 0]));
}

#[test]
fn dimensional_homomorphism_product_sums_dimensions() {
    let a = get_specified_unit("kg", true).unwrap();
    let b = get_specified_unit("s", true).unwrap();
    let product = get_specified_unit("kg.s", true).unwrap();
    for axis in 0..7 {
        assert_eq!(product.dimension.0[axis], a.dimension.0[axis] + b.dimension.0[axis]);
    }
}

#[test]
fn dimensional_homomorphism_quotient_subtracts_dimensions() {
    let a = get_specified_unit("kg", true).unwrap();
    let b = get_specified_unit("s", true).unwrap();
    let quotient = get_specified_unit("kg/s", true).unwrap();
    for axis in 0..7 {
        assert_eq!(quotient.dimension.0[axis], a.dimension.0[axis] - b.dimension.0[axis]);
    }
}

#[test]
fn dimensional_homomorphism_power_scales_dimension() {
    let a = get_specified_unit("m", true).unwrap();
    let squared = get_specified_unit("m2", true).unwrap();
    for axis in 0..7 {
        assert_eq!(squared.dimension.0[axis], a.dimension.0[axis] * 2);
    }
}

#[test]
fn inversion_round_trips_within_relative_tolerance() {
    let forward = convert("km", 3.0, "[ft_i]", true).unwrap();
    let back = convert("[ft_i]", forward.magnitude, "km", true).unwrap();
    assert!(((back.magnitude - 3.0) / 3.0).abs() < 1e-12);
}

#[test]
fn identity_conversion_is_exact() {
    let result = convert("m", 42.0, "m", true).unwrap();
    assert_eq!(result.magnitude, 42.0);
}

#[test]
fn commutativity_of_dot() {
    let ab = get_specified_unit("kg.s", true).unwrap();
    let ba = get_specified_unit("s.kg", true).unwrap();
    assert_eq!(ab.magnitude, ba.magnitude);
    assert_eq!(ab.dimension, ba.dimension);
}

#[test]
fn annotation_inertness() {
    let plain = get_specified_unit("mol", true).unwrap();
    let annotated = get_specified_unit("mol{creatine}", true).unwrap();
    assert_eq!(plain.magnitude, annotated.magnitude);
    assert_eq!(plain.dimension, annotated.dimension);
    assert_ne!(plain.name, annotated.name);
}

#[test]
fn non_ratio_guard_rejects_celsius_times_meter() {
    let result = validate("Cel.m", true);
    assert!(!result.valid);
}

#[test]
fn whitespace_rejection() {
    let result = validate("kg m", true);
    assert!(!result.valid);
}

#[test]
fn catalog_immutability_across_parses() {
    let a = get_specified_unit("m", true).unwrap();
    let b = get_specified_unit("m", true).unwrap();
    assert_eq!(a.cs_code, b.cs_code);
    assert_eq!(a.magnitude, b.magnitude);
    assert_eq!(a.dimension, b.dimension);
}

#[test]
fn full_unit_name_is_corrected_to_its_code() {
    let result = validate("meter", true);
    assert!(result.valid);
    assert!(result.messages.iter().any(|m| m.text.contains("full_name_to_code")));
    assert_eq!(result.unit.unwrap().cs_code, "m");
}

#[test]
fn missing_brackets_around_bracketed_atom_are_inserted() {
    let result = validate("in_i", true);
    assert!(result.valid);
    assert!(result.messages.iter().any(|m| m.text.contains("missing_bracket")));
    assert_eq!(result.unit.unwrap().cs_code, "[in_i]");
}

#[test]
fn brace_for_bracket_hint_on_bare_annotation() {
    let result = validate("{degF}", true);
    assert!(result.valid);
    assert!(result.messages.iter().any(|m| m.text.contains("brace_for_bracket")));
}

#[test]
fn power_of_ten_literal_from_spec_overview_example() {
    // `10*-6.mol/L` from `spec.md` §1: a micromolar concentration, built
    // from the bare power-of-ten literal `10*-6` times `mol` over `L`.
    let result = validate("10*-6.mol/L", true);
    assert!(result.valid);
    let unit = result.unit.unwrap();
    assert_eq!(unit.dimension, Dimension::new([0, -3, 0, 0, 0, 0, 0]));
    let expected = 1e-6 * 6.0221367e23 / 0.001;
    assert!(((unit.magnitude - expected) / expected).abs() < 1e-9);
}
