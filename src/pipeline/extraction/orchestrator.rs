use std::sync::Arc;

use super::confidence::{direct_text_confidence, thresholds};
use super::lab_values::LabValueExtractor;
use super::medical_correction::correct_medical_terms;
use super::ocr::UnavailableOcrEngine;
use super::pdf::PdfTextExtractor;
use super::sanitize::sanitize_extracted_text;
use super::types::{ExtractionMethod, OcrEngine, OcrPageResult, OcrResult, PdfExtractor};
use super::ExtractionError;
use crate::config::PipelineConfig;
use crate::models::SourceKind;

/// Text obtained from a source, before structuring.
#[derive(Debug, Clone)]
struct AcquiredText {
    text: String,
    confidence: f32,
    method: ExtractionMethod,
    /// Non-fatal problems (e.g. a failed OCR fallback).
    warnings: Vec<String>,
}

/// Turns raw PDF, image or text bytes into an [`OcrResult`].
///
/// Digital PDFs are read directly; short or unreadable PDFs and images go
/// through the injected OCR engine under the configured timeout. Every
/// failure becomes `success == false`; nothing is propagated.
pub struct LabDocumentProcessor {
    ocr_engine: Arc<dyn OcrEngine>,
    pdf_extractor: Arc<dyn PdfExtractor>,
    extractor: LabValueExtractor,
    config: PipelineConfig,
}

impl Default for LabDocumentProcessor {
    fn default() -> Self {
        Self::new(
            Arc::new(UnavailableOcrEngine),
            Arc::new(PdfTextExtractor),
            PipelineConfig::default(),
        )
    }
}

impl LabDocumentProcessor {
    pub fn new(
        ocr_engine: Arc<dyn OcrEngine>,
        pdf_extractor: Arc<dyn PdfExtractor>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            ocr_engine,
            pdf_extractor,
            extractor: LabValueExtractor::new(),
            config,
        }
    }

    pub fn with_extractor(mut self, extractor: LabValueExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process bytes whose kind is sniffed from magic bytes.
    pub async fn process_detected(&self, bytes: &[u8]) -> OcrResult {
        self.process(bytes, SourceKind::detect(bytes)).await
    }

    /// Acquire text from `bytes` and run lab value extraction on it.
    pub async fn process(&self, bytes: &[u8], kind: SourceKind) -> OcrResult {
        tracing::info!(kind = kind.as_str(), size = bytes.len(), "Processing lab document");

        match self.acquire_text(bytes, kind).await {
            Ok(acquired) => {
                let structured = self.extractor.extract(&acquired.text);
                tracing::info!(
                    method = ?acquired.method,
                    confidence = acquired.confidence,
                    chars = acquired.text.len(),
                    results = structured.test_results.len(),
                    "Lab document processed"
                );
                OcrResult {
                    success: true,
                    text: Some(acquired.text),
                    structured_data: Some(structured),
                    confidence: acquired.confidence,
                    method: Some(acquired.method),
                    errors: acquired.warnings,
                }
            }
            Err(e) => {
                tracing::warn!(kind = kind.as_str(), error = %e, "Lab document processing failed");
                OcrResult::failed(e.to_string())
            }
        }
    }

    async fn acquire_text(
        &self,
        bytes: &[u8],
        kind: SourceKind,
    ) -> Result<AcquiredText, ExtractionError> {
        match kind {
            SourceKind::PlainText => {
                let raw = std::str::from_utf8(bytes)
                    .map_err(|e| ExtractionError::EncodingError(e.to_string()))?;
                Ok(AcquiredText {
                    text: sanitize_extracted_text(raw),
                    confidence: thresholds::PLAIN_TEXT,
                    method: ExtractionMethod::PlainTextRead,
                    warnings: vec![],
                })
            }
            SourceKind::Image => {
                let page = self.run_ocr(bytes).await?;
                Ok(self.from_ocr(page, vec![]))
            }
            SourceKind::Pdf => self.acquire_pdf_text(bytes).await,
        }
    }

    async fn acquire_pdf_text(&self, bytes: &[u8]) -> Result<AcquiredText, ExtractionError> {
        let direct = match self.pdf_extractor.extract_text(bytes) {
            Ok(raw) => sanitize_extracted_text(&raw),
            Err(pdf_err) => {
                tracing::info!(error = %pdf_err, "PDF text extraction failed, falling back to OCR");
                return match self.run_ocr(bytes).await {
                    Ok(page) => Ok(self.from_ocr(page, vec![pdf_err.to_string()])),
                    Err(ocr_err) => Err(ExtractionError::OcrProcessing(format!(
                        "{pdf_err}; OCR fallback: {ocr_err}"
                    ))),
                };
            }
        };

        let min_chars = self.config.scanned_pdf_min_chars;
        let chars = direct.chars().count();
        if chars > min_chars {
            return Ok(AcquiredText {
                confidence: direct_text_confidence(chars, min_chars),
                text: direct,
                method: ExtractionMethod::PdfDirect,
                warnings: vec![],
            });
        }

        tracing::info!(chars, min_chars, "PDF text layer too short, trying OCR");
        match self.run_ocr(bytes).await {
            Ok(page) if !page.text.trim().is_empty() => Ok(self.from_ocr(page, vec![])),
            Ok(_) if direct.is_empty() => Err(ExtractionError::OcrProcessing(
                "no text found in PDF".into(),
            )),
            Ok(_) => Ok(self.short_direct(direct, vec!["OCR fallback returned no text".into()])),
            Err(ocr_err) if direct.is_empty() => Err(ocr_err),
            Err(ocr_err) => {
                tracing::warn!(error = %ocr_err, "OCR fallback failed, keeping short PDF text");
                Ok(self.short_direct(direct, vec![ocr_err.to_string()]))
            }
        }
    }

    fn short_direct(&self, text: String, warnings: Vec<String>) -> AcquiredText {
        AcquiredText {
            confidence: direct_text_confidence(text.chars().count(), self.config.scanned_pdf_min_chars),
            text,
            method: ExtractionMethod::PdfDirect,
            warnings,
        }
    }

    fn from_ocr(&self, page: OcrPageResult, warnings: Vec<String>) -> AcquiredText {
        let clean = sanitize_extracted_text(&page.text);
        let text = if self.config.apply_ocr_term_correction {
            let corrected = correct_medical_terms(&clean);
            if corrected.corrections > 0 {
                tracing::debug!(corrections = corrected.corrections, "Corrected OCR terms");
            }
            corrected.text
        } else {
            clean
        };

        AcquiredText {
            text,
            confidence: page.confidence.clamp(0.0, 1.0),
            method: ExtractionMethod::Ocr,
            warnings,
        }
    }

    /// Run the blocking OCR engine off the async executor, bounded by
    /// `config.ocr_timeout`.
    async fn run_ocr(&self, bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        let engine = Arc::clone(&self.ocr_engine);
        let image = bytes.to_vec();
        let budget = self.config.ocr_timeout;

        let task = tokio::task::spawn_blocking(move || engine.ocr_image(&image));
        match tokio::time::timeout(budget, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(ExtractionError::TaskJoin(join_err.to_string())),
            Err(_) => {
                tracing::warn!(timeout_ms = budget.as_millis() as u64, "OCR timed out");
                Err(ExtractionError::OcrTimeout(budget))
            }
        }
    }
}
