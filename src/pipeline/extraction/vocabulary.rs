use std::sync::LazyLock;

use regex::Regex;

use super::confidence::thresholds;
use crate::pipeline::similarity::StringSimilarity;

/// Test names recognized with full confidence.
pub const KNOWN_TESTS: &[&str] = &[
    "Glucose",
    "Hemoglobin A1c",
    "HbA1c",
    "Insulin",
    "Cholesterol",
    "LDL",
    "HDL",
    "Triglycerides",
    "TSH",
    "Free T4",
    "Free T3",
    "Testosterone",
    "Vitamin D",
    "B12",
    "Ferritin",
    "Iron",
    "CRP",
    "hs-CRP",
    "Homocysteine",
    "ALT",
    "AST",
    "Creatinine",
    "BUN",
    "eGFR",
    "Sodium",
    "Potassium",
    "Calcium",
    "Magnesium",
];

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

static QUALIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:total|serum|plasma)\b").expect("valid regex"));

/// Canonical form of a captured test name.
///
/// `"Cholesterol, Total"` becomes `"Cholesterol"`, `"Serum  Iron*"` becomes
/// `"Iron"`.
pub fn normalize_test_name(raw: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    let stripped = PUNCTUATION_RE.replace_all(&collapsed, "");
    let unqualified = QUALIFIER_RE.replace_all(&stripped, "");
    WHITESPACE_RE
        .replace_all(&unqualified, " ")
        .trim()
        .to_string()
}

/// Confidence that `name` is a real test, scored against `vocabulary`.
///
/// Exact (case-insensitive) match wins over containment, which wins over the
/// best fuzzy score.
pub fn name_confidence(
    name: &str,
    vocabulary: &[&str],
    similarity: &dyn StringSimilarity,
) -> f32 {
    let lower = name.to_lowercase();

    if vocabulary.iter().any(|t| t.to_lowercase() == lower) {
        return thresholds::EXACT_NAME;
    }

    let contained = vocabulary.iter().any(|t| {
        let t = t.to_lowercase();
        lower.contains(&t) || t.contains(&lower)
    });
    if contained {
        return thresholds::CONTAINED_NAME;
    }

    vocabulary
        .iter()
        .map(|t| similarity.similarity(&lower, &t.to_lowercase()))
        .fold(0.0_f64, f64::max) as f32
}
