use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::models::RangeStatus;

/// Structured output of one lab-text extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedLabData {
    pub patient_info: PatientInfo,
    pub lab_info: LabInfo,
    pub test_results: Vec<ExtractedTestResult>,
    pub metadata: ExtractionMetadata,
}

/// Best-effort patient header. `None` means no pattern matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub patient_id: Option<String>,
    /// Single upper-case letter, `M` or `F`.
    pub gender: Option<String>,
}

/// Best-effort laboratory header. `None` means no pattern matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabInfo {
    pub lab_name: Option<String>,
    pub collection_date: Option<String>,
    pub report_date: Option<String>,
}

/// One parsed test row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTestResult {
    pub test_name: String,
    pub value: String,
    pub unit: String,
    pub reference_range: String,
    pub flag: String,
    /// Name-match confidence; always above the drop floor.
    pub confidence: f32,
    /// Position against functional-medicine ranges, when the marker is known
    /// and the value is numeric.
    pub functional_status: Option<RangeStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub total_lines: usize,
    pub candidate_rows: usize,
    pub dropped_low_confidence: usize,
}

/// How text was obtained from a source document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    PdfDirect,
    Ocr,
    PlainTextRead,
}

/// Outcome of processing a raw source document.
///
/// Failures are values here: `success == false`, `confidence == 0.0` and a
/// non-empty `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    pub success: bool,
    pub text: Option<String>,
    pub structured_data: Option<ExtractedLabData>,
    pub confidence: f32,
    pub method: Option<ExtractionMethod>,
    pub errors: Vec<String>,
}

impl OcrResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            structured_data: None,
            confidence: 0.0,
            method: None,
            errors: vec![error.into()],
        }
    }
}

/// Raw OCR result from the engine
#[derive(Debug, Clone)]
pub struct OcrPageResult {
    pub text: String,
    /// Mean recognition confidence in `[0, 1]`.
    pub confidence: f32,
}

/// OCR engine abstraction (allows mocking for tests).
///
/// The one slow, blocking capability in the pipeline; callers wrap it in a
/// timeout.
pub trait OcrEngine: Send + Sync {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError>;
}

/// PDF text-layer extraction abstraction
pub trait PdfExtractor: Send + Sync {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError>;
}
