//! Generates the static UCUM catalog from `data/ucum_catalog.json` at
//! compile time, the way this crate has always built its registry from a
//! declarative dataset — only the source format changed from the UCUM XML
//! essence file to the JSON schema `spec.md` §6 defines.

use serde::Deserialize;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct CatalogFile {
    prefixes: Vec<PrefixRecord>,
    units: Vec<UnitRecordJson>,
}

#[derive(Deserialize)]
struct PrefixRecord {
    code: String,
    #[serde(rename = "codeSyn")]
    code_syn: String,
    name: String,
    value: f64,
    #[allow(dead_code)]
    exp: i32,
    base: i32,
}

#[derive(Deserialize)]
struct UnitRecordJson {
    code: String,
    #[serde(rename = "codeSyn")]
    code_syn: String,
    name: String,
    property: String,
    #[serde(rename = "printSymbol")]
    print_symbol: String,
    class: String,
    #[serde(rename = "isMetric")]
    is_metric: bool,
    #[serde(rename = "isSpecial")]
    is_special: bool,
    #[serde(rename = "isArbitrary")]
    is_arbitrary: bool,
    magnitude: f64,
    dim: [i8; 7],
    cnv: Option<String>,
    #[serde(rename = "cnvPfx")]
    cnv_pfx: f64,
    synonyms: Vec<String>,
}

fn rust_str_lit(s: &str) -> String {
    format!("{s:?}")
}

fn special_kind_expr(cnv: &Option<String>) -> &'static str {
    match cnv.as_deref() {
        None => "crate::types::SpecialKind::None",
        Some("Cel") => "crate::types::SpecialKind::Celsius",
        Some("degF") => "crate::types::SpecialKind::Fahrenheit",
        Some("ln") => "crate::types::SpecialKind::LnBel",
        Some("lg") => "crate::types::SpecialKind::Log10Bel",
        Some("2lg") => "crate::types::SpecialKind::Log2Bel",
        Some("ld") => "crate::types::SpecialKind::Ld",
        Some("tan") | Some("100tan") => "crate::types::SpecialKind::Tan100",
        Some("pH") => "crate::types::SpecialKind::PH",
        Some(other) => panic!("unknown conversion function tag in catalog: {other}"),
    }
}

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let catalog_path = Path::new(&manifest_dir).join("data/ucum_catalog.json");
    println!("cargo:rerun-if-changed={}", catalog_path.display());

    let raw = fs::read_to_string(&catalog_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", catalog_path.display()));
    let catalog: CatalogFile = serde_json::from_str(&raw)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", catalog_path.display()));

    let mut seen_cs = std::collections::HashSet::new();
    let mut seen_ci = std::collections::HashSet::new();
    for p in &catalog.prefixes {
        if !seen_cs.insert(p.code.clone()) {
            panic!("duplicate prefix code: {}", p.code);
        }
        if !seen_ci.insert(p.code_syn.to_uppercase()) {
            panic!("duplicate case-insensitive prefix code: {}", p.code_syn);
        }
    }
    seen_cs.clear();
    seen_ci.clear();
    for u in &catalog.units {
        if !seen_cs.insert(u.code.clone()) {
            panic!("duplicate unit code: {}", u.code);
        }
        if !seen_ci.insert(u.code_syn.to_uppercase()) {
            panic!("duplicate case-insensitive unit code: {}", u.code_syn);
        }
    }

    let mut out = String::new();

    writeln!(out, "pub static PREFIXES: &[crate::types::Prefix] = &[").unwrap();
    for p in &catalog.prefixes {
        writeln!(
            out,
            "    crate::types::Prefix {{ code: {}, code_ci: {}, name: {}, factor: {:?}, base: {} }},",
            rust_str_lit(&p.code),
            rust_str_lit(&p.code_syn.to_uppercase()),
            rust_str_lit(&p.name),
            p.value,
            p.base,
        )
        .unwrap();
    }
    writeln!(out, "];").unwrap();

    writeln!(out, "pub static UNITS: &[crate::types::UnitRecord] = &[").unwrap();
    for u in &catalog.units {
        let synonyms = u
            .synonyms
            .iter()
            .map(|s| rust_str_lit(s))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "    crate::types::UnitRecord {{ code: {}, code_ci: {}, name: {}, property: {}, print_symbol: {}, class: {}, is_metric: {}, is_special: {}, is_arbitrary: {}, magnitude: {:?}, dim: crate::types::Dimension([{},{},{},{},{},{},{}]), special: {}, cnv_pfx: {:?}, synonyms: &[{}] }},",
            rust_str_lit(&u.code),
            rust_str_lit(&u.code_syn.to_uppercase()),
            rust_str_lit(&u.name),
            rust_str_lit(&u.property),
            rust_str_lit(&u.print_symbol),
            rust_str_lit(&u.class),
            u.is_metric,
            u.is_special,
            u.is_arbitrary,
            u.magnitude,
            u.dim[0], u.dim[1], u.dim[2], u.dim[3], u.dim[4], u.dim[5], u.dim[6],
            special_kind_expr(&u.cnv),
            u.cnv_pfx,
            synonyms,
        )
        .unwrap();
    }
    writeln!(out, "];").unwrap();

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest = Path::new(&out_dir).join("registry_data.rs");
    fs::write(&dest, out).unwrap();
    println!("cargo:rustc-env=UCUM_REGISTRY={}", dest.display());
}
