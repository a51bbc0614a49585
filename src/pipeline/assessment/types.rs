use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Priority, Severity};

/// One questionnaire section after scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub section_name: String,
    pub score: f64,
    pub max_possible: f64,
    /// `score / max_possible * 100`. Not clamped: above 100 means the source
    /// data is inconsistent, and a warning is attached to the analysis.
    pub percentage: f64,
    pub severity: Severity,
    pub interpretation: String,
}

/// Something wrong with the input that did not stop scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    ScoreExceedsMaximum {
        section: String,
        score: f64,
        max_possible: f64,
        percentage: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaqAnalysis {
    pub total_score: f64,
    /// Highest percentage first; ties keep section order.
    pub sections: Vec<SectionScore>,
    /// High and critical sections, highest percentage first.
    pub top_concerns: Vec<String>,
    /// First three top concerns.
    pub primary_systems: Vec<String>,
    /// One to five entries.
    pub recommendations: Vec<String>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Raw questionnaire answers as stored by the response collaborator.
///
/// Pre-aggregated section totals take precedence: when any are present the
/// per-question scores are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NaqResponses {
    pub question_scores: BTreeMap<u32, f64>,
    /// Section name and total, in storage order. A repeated name overwrites
    /// the earlier total in place.
    pub section_totals: Vec<(String, f64)>,
}

impl NaqResponses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_question(mut self, question: u32, score: f64) -> Self {
        self.question_scores.insert(question, score);
        self
    }

    pub fn with_section_total(mut self, section: &str, total: f64) -> Self {
        self.set_section_total(section, total);
        self
    }

    pub fn set_section_total(&mut self, section: &str, total: f64) {
        match self.section_totals.iter_mut().find(|(name, _)| name == section) {
            Some(entry) => entry.1 = total,
            None => self.section_totals.push((section.to_string(), total)),
        }
    }

    /// Record a stored row by its item key (`"NAQ Q52"`,
    /// `"NAQ Section Total: Adrenal"`, `"52"`). Returns `false` and ignores
    /// the row when the key is not recognized.
    pub fn record(&mut self, item_key: &str, value: f64) -> bool {
        match NaqItemKey::parse(item_key) {
            Some(NaqItemKey::Question(q)) => {
                self.question_scores.insert(q, value);
                true
            }
            Some(NaqItemKey::SectionTotal(name)) => {
                self.set_section_total(&name, value);
                true
            }
            None => {
                tracing::debug!(item_key, "Ignoring unrecognized NAQ item key");
                false
            }
        }
    }

    pub fn has_section_totals(&self) -> bool {
        !self.section_totals.is_empty()
    }
}

/// Canonical item names used by the response store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NaqItemKey {
    Question(u32),
    SectionTotal(String),
}

static QUESTION_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:NAQ\s*)?Q?\s*(\d+)$").expect("valid regex"));

static SECTION_TOTAL_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:NAQ\s+)?Section\s+Total:\s*(.+)$").expect("valid regex")
});

impl NaqItemKey {
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        if let Some(caps) = SECTION_TOTAL_KEY_RE.captures(key) {
            let name = caps[1].trim();
            return (!name.is_empty()).then(|| Self::SectionTotal(name.to_string()));
        }
        QUESTION_KEY_RE
            .captures(key)
            .and_then(|caps| caps[1].parse().ok())
            .map(Self::Question)
    }
}

/// One scored symptom from a symptom-burden questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomItem {
    pub name: String,
    pub score: f64,
    /// `None` when the stored label is not high/medium/low.
    pub priority: Option<Priority>,
}

impl SymptomItem {
    pub fn new(name: &str, score: f64, priority_label: &str) -> Self {
        Self {
            name: name.to_string(),
            score,
            priority: Priority::from_label(priority_label),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityBuckets {
    pub high: Vec<SymptomItem>,
    pub medium: Vec<SymptomItem>,
    pub low: Vec<SymptomItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomBurdenAnalysis {
    pub total_burden: f64,
    pub by_priority: PriorityBuckets,
    /// Up to five items scoring at least 6, highest first.
    pub top_symptoms: Vec<SymptomItem>,
    pub interpretation: String,
}
