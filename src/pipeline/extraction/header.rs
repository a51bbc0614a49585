//! Patient and laboratory header metadata.
//!
//! Every field has an ordered pattern list. Lines are scanned top to bottom;
//! the first pattern that matches an unset field sets it, and a set field is
//! never overwritten.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{LabInfo, PatientInfo};

/// Laboratories recognized by name, checked against the first lines only.
pub const KNOWN_LABS: &[&str] = &[
    "LabCorp",
    "Quest",
    "Boston Heart",
    "Cleveland Heart",
    "Genova",
    "Great Plains",
];

/// How many leading lines are searched for a laboratory name.
pub const LAB_NAME_SCAN_LINES: usize = 10;

const DATE_TOKEN: &str = r"(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatientField {
    Name,
    DateOfBirth,
    PatientId,
    Gender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabDateField {
    Collection,
    Report,
}

fn pattern(p: &str) -> Regex {
    Regex::new(&format!("(?i){p}")).expect("valid regex")
}

static PATIENT_PATTERNS: LazyLock<Vec<(PatientField, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            PatientField::Name,
            vec![
                pattern(r"Patient:\s*(.+)"),
                pattern(r"Name:\s*(.+)"),
                pattern(r"Patient Name:\s*(.+)"),
            ],
        ),
        (
            PatientField::DateOfBirth,
            vec![
                pattern(&format!(r"DOB:\s*{DATE_TOKEN}")),
                pattern(&format!(r"Date of Birth:\s*{DATE_TOKEN}")),
                pattern(&format!(r"Birth Date:\s*{DATE_TOKEN}")),
            ],
        ),
        (
            PatientField::PatientId,
            vec![
                pattern(r"Patient ID:\s*(\S+)"),
                pattern(r"MRN:\s*(\S+)"),
                pattern(r"Account #:\s*(\S+)"),
            ],
        ),
        (
            PatientField::Gender,
            vec![
                pattern(r"Gender:\s*(M|F|Male|Female)"),
                pattern(r"Sex:\s*(M|F|Male|Female)"),
            ],
        ),
    ]
});

static LAB_DATE_PATTERNS: LazyLock<Vec<(LabDateField, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            LabDateField::Collection,
            vec![
                pattern(&format!(r"Collection Date:\s*{DATE_TOKEN}")),
                pattern(&format!(r"Collected:\s*{DATE_TOKEN}")),
            ],
        ),
        (
            LabDateField::Report,
            vec![
                pattern(&format!(r"Report Date:\s*{DATE_TOKEN}")),
                pattern(&format!(r"Reported:\s*{DATE_TOKEN}")),
            ],
        ),
    ]
});

fn first_capture(patterns: &[Regex], line: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

impl PatientInfo {
    fn slot(&mut self, field: PatientField) -> &mut Option<String> {
        match field {
            PatientField::Name => &mut self.name,
            PatientField::DateOfBirth => &mut self.date_of_birth,
            PatientField::PatientId => &mut self.patient_id,
            PatientField::Gender => &mut self.gender,
        }
    }
}

impl LabInfo {
    fn date_slot(&mut self, field: LabDateField) -> &mut Option<String> {
        match field {
            LabDateField::Collection => &mut self.collection_date,
            LabDateField::Report => &mut self.report_date,
        }
    }
}

/// Patient header fields from trimmed, non-empty lines.
pub fn extract_patient_info(lines: &[&str]) -> PatientInfo {
    let mut info = PatientInfo::default();

    for line in lines {
        for (field, patterns) in PATIENT_PATTERNS.iter() {
            let slot = info.slot(*field);
            if slot.is_some() {
                continue;
            }
            if let Some(value) = first_capture(patterns, line) {
                *slot = Some(match field {
                    PatientField::Gender => normalize_gender(&value),
                    PatientField::Name => value.trim().to_string(),
                    _ => value,
                });
            }
        }
    }

    info
}

/// Laboratory header fields from trimmed, non-empty lines.
pub fn extract_lab_info(lines: &[&str]) -> LabInfo {
    let mut info = LabInfo {
        lab_name: detect_lab_name(lines),
        ..LabInfo::default()
    };

    for line in lines {
        for (field, patterns) in LAB_DATE_PATTERNS.iter() {
            let slot = info.date_slot(*field);
            if slot.is_none() {
                *slot = first_capture(patterns, line);
            }
        }
    }

    info
}

fn detect_lab_name(lines: &[&str]) -> Option<String> {
    lines.iter().take(LAB_NAME_SCAN_LINES).find_map(|line| {
        let lower = line.to_lowercase();
        KNOWN_LABS
            .iter()
            .find(|lab| lower.contains(&lab.to_lowercase()))
            .map(|lab| lab.to_string())
    })
}

/// `"male"`, `"M"`, `"f"` ... to a single upper-case letter.
fn normalize_gender(raw: &str) -> String {
    raw.chars()
        .next()
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}
