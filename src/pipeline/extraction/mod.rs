pub mod types;
pub mod confidence;
pub mod sanitize;
pub mod vocabulary;
pub mod header;
pub mod dates;
pub mod functional_ranges;
pub mod lab_values;
pub mod medical_correction;
pub mod hash;
pub mod ocr;
pub mod pdf;
pub mod orchestrator;

pub use types::*;
pub use confidence::*;
pub use sanitize::*;
pub use lab_values::*;
pub use ocr::*;
pub use pdf::*;
pub use orchestrator::*;

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("OCR timed out after {0:?}")]
    OcrTimeout(Duration),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("Background extraction task failed: {0}")]
    TaskJoin(String),
}
