use serde::{Deserialize, Serialize};

/// Type label returned when no signature fires.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Lab-report type label; the only type that gets a `sub_type`.
pub const LAB_REPORT_TYPE: &str = "labReport";

/// Outcome of classifying one document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub doc_type: String,
    /// `matches / patterns` of the winning signature, in `[0, 1]`.
    pub confidence: f32,
    pub sub_type: Option<String>,
    pub metadata: ClassificationMetadata,
}

impl Classification {
    pub fn is_unknown(&self) -> bool {
        self.doc_type == UNKNOWN_TYPE
    }
}

/// Light metadata extracted independently of the winning type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetadata {
    pub laboratory: Option<String>,
    pub test_date: Option<String>,
    /// Presence marker only. Patient identifiers are never retained here.
    pub patient_info: Option<PatientPresence>,
    pub document_sections: Vec<String>,
}

/// Privacy-preserving stand-in for a detected patient block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientPresence {
    pub present: bool,
    pub anonymized: bool,
}

impl PatientPresence {
    pub const DETECTED: Self = Self {
        present: true,
        anonymized: true,
    };
}
