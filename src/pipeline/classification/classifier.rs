use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::signatures::{SignatureTable, DEFAULT_TABLE};
use super::types::{
    Classification, ClassificationMetadata, PatientPresence, LAB_REPORT_TYPE, UNKNOWN_TYPE,
};

/// Confidence added when the filename agrees with the winning type.
pub const FILENAME_BOOST: f32 = 0.2;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:date|collected|drawn)[\s:]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})")
        .expect("valid regex")
});

/// Tried in order; first hit wins.
static LAB_NAME_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)(?:laboratory|lab)[\s:]*([A-Za-z\s&]+?)(?:\n|$)").expect("valid regex"),
        Regex::new(r"(?im)^([A-Za-z\s&]+?)\s*(?:laboratory|diagnostics|lab)")
            .expect("valid regex"),
    ]
});

static PATIENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)patient[\s:]*([^\n]+)").expect("valid regex"));

/// A signature that reached its required-match threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureHit {
    pub name: &'static str,
    pub matches: usize,
    pub score: f32,
}

/// Scores text against a [`SignatureTable`].
///
/// Holds only an `Arc` to immutable tables, so one instance can be shared
/// across threads or cloned per worker.
#[derive(Debug, Clone)]
pub struct DocumentClassifier {
    table: Arc<SignatureTable>,
}

impl Default for DocumentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentClassifier {
    /// Classifier over the built-in signature table.
    pub fn new() -> Self {
        Self {
            table: Arc::clone(&DEFAULT_TABLE),
        }
    }

    /// Classifier over a caller-supplied table.
    pub fn with_table(table: Arc<SignatureTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SignatureTable {
        &self.table
    }

    /// Classify raw document text.
    pub fn classify(&self, text: &str) -> Classification {
        let lower = text.to_lowercase();
        let hits = self.score_signatures(&lower);

        let (doc_type, confidence) = match hits.first() {
            Some(top) => (top.name, top.score),
            None => (UNKNOWN_TYPE, 0.0),
        };

        let sub_type = if doc_type == LAB_REPORT_TYPE && hits.len() > 1 {
            self.table
                .lab_sub_types
                .iter()
                .find(|sub| hits.iter().any(|h| h.name == **sub))
                .map(|sub| sub.to_string())
        } else {
            None
        };

        let metadata = self.extract_metadata(text, &lower, doc_type);

        tracing::info!(
            doc_type,
            confidence,
            sub_type = sub_type.as_deref().unwrap_or("-"),
            fired = hits.len(),
            sections = metadata.document_sections.len(),
            "Document classified"
        );

        Classification {
            doc_type: doc_type.to_string(),
            confidence,
            sub_type,
            metadata,
        }
    }

    /// Every signature that fired, best first. Ties keep table order.
    pub fn score_signatures(&self, lower_text: &str) -> Vec<SignatureHit> {
        let mut hits: Vec<SignatureHit> = self
            .table
            .signatures
            .iter()
            .filter_map(|sig| {
                let matches = sig.match_count(lower_text);
                if matches < sig.required_matches || sig.patterns.is_empty() {
                    return None;
                }
                tracing::debug!(signature = sig.name, matches, "Signature fired");
                Some(SignatureHit {
                    name: sig.name,
                    matches,
                    score: matches as f32 / sig.patterns.len() as f32,
                })
            })
            .collect();

        // Stable sort: equal scores stay in declaration order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits
    }

    /// Boost confidence by [`FILENAME_BOOST`] (capped at 1.0) when the
    /// filename matches a pattern for the winning type.
    ///
    /// Not idempotent: each call boosts again. Call at most once per
    /// classification.
    pub fn enhance_classification(
        &self,
        mut classification: Classification,
        file_name: Option<&str>,
    ) -> Classification {
        let Some(name) = file_name else {
            return classification;
        };
        let lower = name.to_lowercase();
        let matched = self
            .table
            .filename_patterns_for(&classification.doc_type)
            .iter()
            .any(|p| p.is_match(&lower));

        if matched {
            let boosted = (classification.confidence + FILENAME_BOOST).min(1.0);
            tracing::debug!(
                doc_type = %classification.doc_type,
                from = classification.confidence,
                to = boosted,
                "Filename boosted classification confidence"
            );
            classification.confidence = boosted;
        }
        classification
    }

    fn extract_metadata(&self, text: &str, lower: &str, doc_type: &str) -> ClassificationMetadata {
        let test_date = DATE_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let laboratory = LAB_NAME_RES.iter().find_map(|re| {
            re.captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|name| !name.is_empty())
        });

        let patient_info = PATIENT_RE
            .is_match(text)
            .then_some(PatientPresence::DETECTED);

        let document_sections = self
            .table
            .sections_for(doc_type)
            .iter()
            .filter(|kw| lower.contains(**kw))
            .map(|kw| kw.to_string())
            .collect();

        ClassificationMetadata {
            laboratory,
            test_date,
            patient_info,
            document_sections,
        }
    }
}

/// Classify with the built-in table.
pub fn classify(text: &str) -> Classification {
    DocumentClassifier::new().classify(text)
}
