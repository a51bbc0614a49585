use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

use super::confidence::passes_result_floor;
use super::functional_ranges::functional_status;
use super::header::{extract_lab_info, extract_patient_info};
use super::types::{ExtractedLabData, ExtractedTestResult, ExtractionMetadata};
use super::vocabulary::{name_confidence, normalize_test_name, KNOWN_TESTS};
use crate::pipeline::similarity::{Levenshtein, StringSimilarity};

/// Words that mark a table header row. Matched case-sensitively.
const HEADER_MARKERS: &[&str] = &["Test Name", "Result", "Reference"];

/// One accepted layout of a result row.
#[derive(Debug)]
pub struct LineShape {
    pub name: &'static str,
    pub regex: Regex,
}

const VALUE: &str = r"(?P<value>\d+\.?\d*)";
const RANGE: &str = r"(?P<range>\d+\.?\d*\s*-\s*\d+\.?\d*)";

/// Row layouts, richest first. The first shape that matches a line wins.
pub static LINE_SHAPES: LazyLock<Vec<LineShape>> = LazyLock::new(|| {
    let shape = |name: &'static str, p: String| LineShape {
        name,
        regex: Regex::new(&p).expect("valid regex"),
    };
    vec![
        shape(
            "name_value_unit_range_flag",
            format!(r"^(?P<name>.+?)\s+{VALUE}\s+(?P<unit>\S+)\s+{RANGE}\s*(?P<flag>[HLC]?)$"),
        ),
        shape(
            "name_value_range_flag",
            format!(r"^(?P<name>.+?)\s+{VALUE}\s+{RANGE}\s*(?P<flag>[HLC]?)$"),
        ),
        shape(
            "name_colon_value_unit_paren_range",
            format!(r"^(?P<name>.+?):\s*{VALUE}\s*(?P<unit>\S+)\s*\({RANGE}\)$"),
        ),
        shape(
            "name_value_unit",
            format!(r"^(?P<name>.+?)\s+{VALUE}\s+(?P<unit>\S+)$"),
        ),
    ]
});

/// Raw captures of a row before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMatch {
    pub shape: &'static str,
    pub raw_name: String,
    pub value: String,
    pub unit: String,
    pub reference_range: String,
    pub flag: String,
}

fn group(caps: &Captures<'_>, name: &str) -> String {
    caps.name(name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Whether a line is a table header rather than a result row.
pub fn is_header_line(line: &str) -> bool {
    HEADER_MARKERS.iter().any(|m| line.contains(m))
}

/// Match one trimmed line against [`LINE_SHAPES`] in order.
pub fn match_row(line: &str) -> Option<RowMatch> {
    LINE_SHAPES.iter().find_map(|shape| {
        let caps = shape.regex.captures(line)?;
        Some(RowMatch {
            shape: shape.name,
            raw_name: group(&caps, "name"),
            value: group(&caps, "value"),
            unit: group(&caps, "unit"),
            reference_range: group(&caps, "range"),
            flag: group(&caps, "flag"),
        })
    })
}

/// Turns lab report text into patient/lab headers and scored result rows.
///
/// Stateless apart from the injected similarity strategy and vocabulary, so
/// one instance can serve many documents concurrently.
#[derive(Clone)]
pub struct LabValueExtractor {
    similarity: Arc<dyn StringSimilarity>,
    vocabulary: &'static [&'static str],
}

impl std::fmt::Debug for LabValueExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabValueExtractor")
            .field("vocabulary", &self.vocabulary.len())
            .finish_non_exhaustive()
    }
}

impl Default for LabValueExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LabValueExtractor {
    pub fn new() -> Self {
        Self {
            similarity: Arc::new(Levenshtein),
            vocabulary: KNOWN_TESTS,
        }
    }

    /// Swap the fuzzy name matcher.
    pub fn with_similarity(mut self, similarity: Arc<dyn StringSimilarity>) -> Self {
        self.similarity = similarity;
        self
    }

    /// Swap the known-test vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: &'static [&'static str]) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Extract headers and test results from text.
    ///
    /// Every returned result has confidence strictly above the 0.3 floor.
    /// Unparseable lines are skipped; duplicates are kept.
    pub fn extract(&self, text: &str) -> ExtractedLabData {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let patient_info = extract_patient_info(&lines);
        let lab_info = extract_lab_info(&lines);

        let mut candidate_rows = 0;
        let mut dropped = 0;
        let mut test_results = Vec::new();

        for line in &lines {
            if is_header_line(line) {
                continue;
            }
            let Some(row) = match_row(line) else {
                continue;
            };
            candidate_rows += 1;

            match self.score_row(row) {
                Some(result) => test_results.push(result),
                None => dropped += 1,
            }
        }

        tracing::info!(
            lines = lines.len(),
            candidates = candidate_rows,
            kept = test_results.len(),
            dropped,
            lab_detected = lab_info.lab_name.is_some(),
            patient_detected = patient_info.name.is_some(),
            "Lab values extracted"
        );

        ExtractedLabData {
            patient_info,
            lab_info,
            test_results,
            metadata: ExtractionMetadata {
                total_lines: lines.len(),
                candidate_rows,
                dropped_low_confidence: dropped,
            },
        }
    }

    fn score_row(&self, row: RowMatch) -> Option<ExtractedTestResult> {
        let test_name = normalize_test_name(&row.raw_name);
        // Nothing left after qualifier removal ("Total 5 mg"): not a test
        if test_name.is_empty() {
            return None;
        }

        let confidence = name_confidence(&test_name, self.vocabulary, self.similarity.as_ref());
        if !passes_result_floor(confidence) {
            tracing::debug!(shape = row.shape, confidence, "Dropped low-confidence row");
            return None;
        }

        let functional_status = functional_status(&test_name, &row.value);
        Some(ExtractedTestResult {
            test_name,
            value: row.value,
            unit: row.unit,
            reference_range: row.reference_range,
            flag: row.flag,
            confidence,
            functional_status,
        })
    }
}

/// Extract with the default vocabulary and similarity.
pub fn extract_lab_values(text: &str) -> ExtractedLabData {
    LabValueExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RangeStatus;
    use crate::pipeline::similarity::StrsimLevenshtein;

    const QUEST_REPORT: &str = "Quest Diagnostics\n\
        Patient: Jane Doe\n\
        DOB: 04/12/1980\n\
        Collected: 03/14/2024\n\
        Test Name    Result    Units    Reference Range\n\
        Glucose 95 mg/dL 70-99\n\
        TSH 4.6 uIU/mL 0.4-4.0 H\n\
        Cholesterol, Total 212 mg/dL 100-199 H\n\
        Vitamin D, 25-OH: 42.1 ng/mL (30-100)\n\
        Ferritin 48 ng/mL\n\
        Qwxz 12 mg\n\
        Comments: fasting specimen";

    #[test]
    fn glucose_row_scenario() {
        let data = extract_lab_values("Glucose 95 mg/dL 70-99");
        assert_eq!(data.test_results.len(), 1);
        let r = &data.test_results[0];
        assert_eq!(r.test_name, "Glucose");
        assert_eq!(r.value, "95");
        assert_eq!(r.unit, "mg/dL");
        assert_eq!(r.reference_range, "70-99");
        assert_eq!(r.flag, "");
        assert_eq!(r.confidence, 1.0);
        assert_eq!(r.functional_status, Some(RangeStatus::Optimal));
    }

    #[test]
    fn full_report() {
        let data = extract_lab_values(QUEST_REPORT);

        assert_eq!(data.lab_info.lab_name.as_deref(), Some("Quest"));
        assert_eq!(data.lab_info.collection_date.as_deref(), Some("03/14/2024"));
        assert_eq!(data.patient_info.name.as_deref(), Some("Jane Doe"));

        let names: Vec<&str> = data.test_results.iter().map(|r| r.test_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Glucose", "TSH", "Cholesterol", "Vitamin D 25-OH", "Ferritin"]
        );

        let tsh = &data.test_results[1];
        assert_eq!(tsh.flag, "H");
        assert_eq!(tsh.functional_status, Some(RangeStatus::AboveConventional));

        let chol = &data.test_results[2];
        assert_eq!(chol.reference_range, "100-199");
        assert_eq!(chol.functional_status, Some(RangeStatus::AboveConventional));

        let vit_d = &data.test_results[3];
        assert_eq!(vit_d.unit, "ng/mL");
        assert_eq!(vit_d.reference_range, "30-100");
        assert_eq!(vit_d.confidence, 0.8);
        assert_eq!(vit_d.functional_status, None);

        let ferritin = &data.test_results[4];
        assert_eq!(ferritin.unit, "ng/mL");
        assert_eq!(ferritin.reference_range, "");

        assert_eq!(data.metadata.total_lines, 12);
        assert_eq!(data.metadata.candidate_rows, 6);
        assert_eq!(data.metadata.dropped_low_confidence, 1);
    }

    #[test]
    fn every_result_is_above_floor() {
        let data = extract_lab_values(QUEST_REPORT);
        assert!(data.test_results.iter().all(|r| r.confidence > 0.3));
    }

    #[test]
    fn shape_without_unit() {
        let data = extract_lab_values("Ferritin 48 30 - 400");
        let r = &data.test_results[0];
        assert_eq!(r.value, "48");
        assert_eq!(r.unit, "");
        assert_eq!(r.reference_range, "30 - 400");
    }

    #[test]
    fn first_shape_wins() {
        // Matches both the range-without-unit and the bare value-unit shapes
        let row = match_row("Glucose 95 70-99").unwrap();
        assert_eq!(row.shape, "name_value_range_flag");
        assert_eq!(row.unit, "");
        assert_eq!(row.reference_range, "70-99");

        // Matches both the richest shape and the unit-less one
        let row = match_row("Glucose 95 100 70-99").unwrap();
        assert_eq!(row.shape, "name_value_unit_range_flag");
        assert_eq!(row.value, "95");
        assert_eq!(row.unit, "100");
    }

    #[test]
    fn unmatched_lines_contribute_nothing() {
        assert_eq!(match_row("Comments: fasting specimen"), None);
        assert_eq!(match_row("Glucose"), None);
        let data = extract_lab_values("Page 1 of 2\nPhysician notes follow");
        assert!(data.test_results.is_empty());
    }

    #[test]
    fn header_skip_is_case_sensitive() {
        assert!(is_header_line("Test Name Result Units"));
        assert!(is_header_line("Lab Results"));
        assert!(!is_header_line("reference glucose"));
    }

    #[test]
    fn duplicates_are_kept() {
        let data = extract_lab_values("Glucose 95 mg/dL 70-99\nGlucose 101 mg/dL 70-99 H");
        assert_eq!(data.test_results.len(), 2);
        assert_eq!(data.test_results[1].value, "101");
        assert_eq!(data.test_results[1].flag, "H");
    }

    #[test]
    fn qualifier_only_name_is_dropped() {
        let data = extract_lab_values("Total 5 mg");
        assert!(data.test_results.is_empty());
        assert_eq!(data.metadata.dropped_low_confidence, 1);
    }

    #[test]
    fn empty_text() {
        let data = extract_lab_values("");
        assert_eq!(data, ExtractedLabData::default());
    }

    #[test]
    fn output_is_byte_identical_across_runs() {
        let a = serde_json::to_string(&extract_lab_values(QUEST_REPORT)).unwrap();
        let b = serde_json::to_string(&extract_lab_values(QUEST_REPORT)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strsim_strategy_gives_same_results() {
        let default = extract_lab_values("Glucise 95 mg/dL\nFerriten 40 ng/mL");
        let strsim = LabValueExtractor::new()
            .with_similarity(Arc::new(StrsimLevenshtein))
            .extract("Glucise 95 mg/dL\nFerriten 40 ng/mL");
        assert_eq!(default.test_results.len(), 2);
        assert_eq!(strsim.test_results.len(), 2);
        for (a, b) in default.test_results.iter().zip(&strsim.test_results) {
            assert_eq!(a.test_name, b.test_name);
            assert!((a.confidence - b.confidence).abs() < 1e-6);
        }
    }

    #[test]
    fn custom_vocabulary() {
        static VOCAB: &[&str] = &["Cortisol"];
        let extractor = LabValueExtractor::new().with_vocabulary(VOCAB);
        let data = extractor.extract("Cortisol 14 ug/dL\nGlucose 95 mg/dL 70-99");
        assert_eq!(data.test_results.len(), 1);
        assert_eq!(data.test_results[0].test_name, "Cortisol");
    }
}
