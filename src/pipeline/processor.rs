//! Document processing entry point: classify -> route -> extract.
//!
//! Scored questionnaires are only routed here. Their answers live in the
//! response store and are scored separately with
//! [`NaqAnalyzer`](crate::pipeline::assessment::NaqAnalyzer).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::classification::{Classification, DocumentClassifier};
use crate::pipeline::extraction::hash::compute_content_hash;
use crate::pipeline::extraction::{
    ExtractedLabData, ExtractionMethod, LabDocumentProcessor, LabValueExtractor,
};

/// Document types whose text goes through lab value extraction.
pub const LAB_VALUE_TYPES: &[&str] = &[
    "labReport",
    "metabolicPanel",
    "thyroid",
    "lipidPanel",
    "inflammatoryMarkers",
    "cgm",
    "dutch",
    "fitTest",
];

/// Document types scored as questionnaires.
pub const QUESTIONNAIRE_TYPES: &[&str] = &["nutriq", "intakeForm", "followUp"];

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Could not read document text: {0}")]
    TextUnavailable(String),
}

/// Where a classified document goes next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Route {
    LabValues(ExtractedLabData),
    ScoredQuestionnaire,
    Unrouted,
}

impl Route {
    pub fn lab_data(&self) -> Option<&ExtractedLabData> {
        match self {
            Self::LabValues(data) => Some(data),
            _ => None,
        }
    }
}

/// How the text was obtained when processing started from raw bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub method: Option<ExtractionMethod>,
    pub confidence: f32,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub document_id: Uuid,
    pub file_name: Option<String>,
    /// Base64 SHA-256 of the input, for de-duplication by the store.
    pub fingerprint: String,
    pub classification: Classification,
    pub route: Route,
    pub source: Option<SourceInfo>,
}

impl ProcessedDocument {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Drives one document through classification and the matching stage.
///
/// Stateless between calls; share one instance freely.
pub struct DocumentProcessor {
    classifier: DocumentClassifier,
    extractor: LabValueExtractor,
    sources: LabDocumentProcessor,
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new(
            DocumentClassifier::new(),
            LabValueExtractor::new(),
            LabDocumentProcessor::default(),
        )
    }
}

impl DocumentProcessor {
    /// `extractor` also replaces the one inside `sources`, so text and byte
    /// input extract identically.
    pub fn new(
        classifier: DocumentClassifier,
        extractor: LabValueExtractor,
        sources: LabDocumentProcessor,
    ) -> Self {
        Self {
            classifier,
            sources: sources.with_extractor(extractor.clone()),
            extractor,
        }
    }

    /// Process already-extracted text.
    pub fn process_text(&self, text: &str, file_name: Option<&str>) -> ProcessedDocument {
        let fingerprint = compute_content_hash(text.as_bytes());
        self.assemble(text, file_name, fingerprint, None, None)
    }

    /// Process raw PDF, image or text bytes.
    ///
    /// Fails only when no text could be obtained; the underlying source
    /// errors are joined into the message.
    pub async fn process_bytes(
        &self,
        bytes: &[u8],
        file_name: Option<&str>,
    ) -> Result<ProcessedDocument, ProcessingError> {
        let fingerprint = compute_content_hash(bytes);
        let acquired = self.sources.process_detected(bytes).await;

        let text = match acquired.text {
            Some(text) if acquired.success => text,
            _ => return Err(ProcessingError::TextUnavailable(acquired.errors.join("; "))),
        };
        let source = SourceInfo {
            method: acquired.method,
            confidence: acquired.confidence,
            warnings: acquired.errors,
        };

        Ok(self.assemble(
            &text,
            file_name,
            fingerprint,
            acquired.structured_data,
            Some(source),
        ))
    }

    fn assemble(
        &self,
        text: &str,
        file_name: Option<&str>,
        fingerprint: String,
        pre_extracted: Option<ExtractedLabData>,
        source: Option<SourceInfo>,
    ) -> ProcessedDocument {
        let document_id = Uuid::new_v4();
        let classification = self
            .classifier
            .enhance_classification(self.classifier.classify(text), file_name);

        let route = if LAB_VALUE_TYPES.contains(&classification.doc_type.as_str()) {
            Route::LabValues(pre_extracted.unwrap_or_else(|| self.extractor.extract(text)))
        } else if QUESTIONNAIRE_TYPES.contains(&classification.doc_type.as_str()) {
            Route::ScoredQuestionnaire
        } else {
            Route::Unrouted
        };

        tracing::info!(
            document_id = %document_id,
            doc_type = %classification.doc_type,
            confidence = classification.confidence,
            route = route_name(&route),
            results = route.lab_data().map_or(0, |d| d.test_results.len()),
            "Document processed"
        );

        ProcessedDocument {
            document_id,
            file_name: file_name.map(str::to_string),
            fingerprint,
            classification,
            route,
            source,
        }
    }
}

fn route_name(route: &Route) -> &'static str {
    match route {
        Route::LabValues(_) => "lab_values",
        Route::ScoredQuestionnaire => "scored_questionnaire",
        Route::Unrouted => "unrouted",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::PipelineConfig;
    use crate::pipeline::extraction::{MockOcrEngine, PdfTextExtractor};

    const LAB_TEXT: &str = "Clinical Laboratory Report\n\
        Lab Results\n\
        Test Name    Result    Units    Reference Range\n\
        Glucose 95 mg/dL 70-99\n\
        Ferritin 48 ng/mL";

    #[test]
    fn lab_report_routes_to_extraction() {
        let doc = DocumentProcessor::default().process_text(LAB_TEXT, None);
        assert_eq!(doc.classification.doc_type, "labReport");
        let data = doc.route.lab_data().expect("lab route");
        assert!(data.test_results.iter().any(|r| r.test_name == "Glucose"));
        assert!(doc.source.is_none());
    }

    #[test]
    fn questionnaire_and_unknown_routes() {
        let p = DocumentProcessor::default();

        let naq = p.process_text("NutriQ Health Assessment\nDigestive Health Score: 12", None);
        assert_eq!(naq.classification.doc_type, "nutriq");
        assert_eq!(naq.route, Route::ScoredQuestionnaire);

        let kbmo = p.process_text("KBMO Diagnostics food sensitivity panel", None);
        assert_eq!(kbmo.classification.doc_type, "kbmo");
        assert_eq!(kbmo.route, Route::Unrouted);

        let other = p.process_text("Weekly newsletter for drivers", None);
        assert!(other.classification.is_unknown());
        assert_eq!(other.route, Route::Unrouted);
    }

    #[test]
    fn filename_boost_applied_once() {
        let p = DocumentProcessor::default();
        let plain = p.process_text(LAB_TEXT, None);
        let named = p.process_text(LAB_TEXT, Some("lab_report_2024.pdf"));
        let boosted = (plain.classification.confidence + 0.2).min(1.0);
        assert!((named.classification.confidence - boosted).abs() < 1e-6);
        assert_eq!(named.file_name.as_deref(), Some("lab_report_2024.pdf"));
    }

    #[test]
    fn fingerprint_is_content_hash_and_ids_are_unique() {
        let p = DocumentProcessor::default();
        let a = p.process_text("abc", None);
        let b = p.process_text("abc", None);
        assert_eq!(a.fingerprint, "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0=");
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_ne!(a.document_id, b.document_id);
    }

    #[test]
    fn json_carries_route_kind() {
        let doc = DocumentProcessor::default().process_text(LAB_TEXT, None);
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(json["route"]["kind"], "lab_values");
        assert_eq!(json["classification"]["type"], "labReport");
    }

    #[tokio::test]
    async fn plain_text_bytes() {
        let doc = DocumentProcessor::default()
            .process_bytes(LAB_TEXT.as_bytes(), Some("results.txt"))
            .await
            .unwrap();
        let source = doc.source.as_ref().unwrap();
        assert_eq!(source.method, Some(ExtractionMethod::PlainTextRead));
        assert!(doc.route.lab_data().is_some());
    }

    #[tokio::test]
    async fn image_bytes_go_through_ocr() {
        let config = PipelineConfig {
            apply_ocr_term_correction: false,
            ..PipelineConfig::default()
        };
        let sources = LabDocumentProcessor::new(
            Arc::new(MockOcrEngine::new(LAB_TEXT, 0.85)),
            Arc::new(PdfTextExtractor),
            config,
        );
        let p = DocumentProcessor::new(DocumentClassifier::new(), LabValueExtractor::new(), sources);

        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let doc = p.process_bytes(&png, None).await.unwrap();
        let source = doc.source.unwrap();
        assert_eq!(source.method, Some(ExtractionMethod::Ocr));
        assert!((source.confidence - 0.85).abs() < 1e-6);
        assert_eq!(doc.classification.doc_type, "labReport");
    }

    #[tokio::test]
    async fn injected_extractor_used_for_bytes_and_text() {
        const VOCABULARY: &[&str] = &["Cortisol"];
        let text = "Clinical Laboratory Report\nLab Results\nCortisol 14.2 ug/dL 6.2-19.4\nGlucose 95 mg/dL 70-99";
        let p = DocumentProcessor::new(
            DocumentClassifier::new(),
            LabValueExtractor::new().with_vocabulary(VOCABULARY),
            LabDocumentProcessor::default(),
        );

        let names = |doc: &ProcessedDocument| -> Vec<String> {
            doc.route
                .lab_data()
                .map(|d| d.test_results.iter().map(|r| r.test_name.clone()).collect())
                .unwrap_or_default()
        };
        let from_text = p.process_text(text, Some("lab_report.txt"));
        let from_bytes = p
            .process_bytes(text.as_bytes(), Some("lab_report.txt"))
            .await
            .unwrap();
        assert_eq!(names(&from_text), names(&from_bytes));
        assert!(names(&from_bytes).contains(&"Cortisol".to_string()));
    }

    #[tokio::test]
    async fn no_text_is_an_error() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let err = DocumentProcessor::default()
            .process_bytes(&png, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::TextUnavailable(_)));
    }
}
