use super::types::PdfExtractor;
use super::ExtractionError;

/// Text-layer extraction for digital PDFs via `pdf-extract`.
///
/// Pages are joined into one string; scanned PDFs come back (nearly) empty and
/// the caller decides whether to fall back to OCR.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        if !pdf_bytes.starts_with(b"%PDF") {
            return Err(ExtractionError::PdfParsing("missing %PDF header".into()));
        }

        pdf_extract::extract_text_from_mem(pdf_bytes).map_err(|e| {
            let message = e.to_string();
            // Font encodings pdf-extract cannot map
            if message.contains("Identity-H") || message.contains("Unimplemented") {
                ExtractionError::EncodingError(message)
            } else {
                ExtractionError::PdfParsing(message)
            }
        })
    }
}
