use std::time::Duration;

use super::types::{OcrEngine, OcrPageResult};
use super::ExtractionError;

/// Fixed-output engine for tests and offline runs.
pub struct MockOcrEngine {
    pub text: String,
    pub confidence: f32,
}

impl MockOcrEngine {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            confidence,
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        Ok(OcrPageResult {
            text: self.text.clone(),
            confidence: self.confidence.clamp(0.0, 1.0),
        })
    }
}

/// Engine that always fails, for exercising the failure boundary.
pub struct FailingOcrEngine {
    pub message: String,
}

impl OcrEngine for FailingOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        Err(ExtractionError::OcrProcessing(self.message.clone()))
    }
}

/// Engine that blocks for `delay` before answering, for timeout tests.
pub struct SlowOcrEngine {
    pub delay: Duration,
    pub inner: MockOcrEngine,
}

impl OcrEngine for SlowOcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        std::thread::sleep(self.delay);
        self.inner.ocr_image(image_bytes)
    }
}

/// Engine used when none is configured: every image fails cleanly.
pub struct UnavailableOcrEngine;

impl OcrEngine for UnavailableOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        Err(ExtractionError::OcrProcessing(
            "no OCR engine configured".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_text() {
        let engine = MockOcrEngine::new("Glucose 95 mg/dL 70-99", 0.92);
        let result = engine.ocr_image(b"fake_image_bytes").unwrap();
        assert_eq!(result.text, "Glucose 95 mg/dL 70-99");
        assert!((result.confidence - 0.92).abs() < f32::EPSILON);
    }

    #[test]
    fn mock_confidence_is_clamped() {
        let engine = MockOcrEngine::new("x", 1.7);
        assert_eq!(engine.ocr_image(b"").unwrap().confidence, 1.0);
    }

    #[test]
    fn failing_engine_errors() {
        let engine = FailingOcrEngine {
            message: "corrupt image".into(),
        };
        let err = engine.ocr_image(b"").unwrap_err();
        assert!(err.to_string().contains("corrupt image"));
    }

    #[test]
    fn unavailable_engine_errors() {
        assert!(UnavailableOcrEngine.ocr_image(b"img").is_err());
    }

    #[test]
    fn slow_engine_eventually_answers() {
        let engine = SlowOcrEngine {
            delay: Duration::from_millis(5),
            inner: MockOcrEngine::new("TSH 2.1 uIU/mL", 0.8),
        };
        assert_eq!(engine.ocr_image(b"").unwrap().text, "TSH 2.1 uIU/mL");
    }
}
