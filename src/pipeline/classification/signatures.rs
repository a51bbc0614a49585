use std::sync::{Arc, LazyLock};

use regex::Regex;

/// A named document type with its detection patterns.
///
/// Fires when at least `required_matches` patterns match; scores
/// `matches / patterns.len()`.
#[derive(Debug, Clone)]
pub struct DocumentSignature {
    pub name: &'static str,
    pub patterns: Vec<Regex>,
    pub required_matches: usize,
}

impl DocumentSignature {
    pub fn new(name: &'static str, patterns: &[&str], required_matches: usize) -> Self {
        Self {
            name,
            patterns: patterns.iter().map(|p| compile(p)).collect(),
            required_matches,
        }
    }

    /// Number of patterns found anywhere in `text`.
    pub fn match_count(&self, text: &str) -> usize {
        self.patterns.iter().filter(|p| p.is_match(text)).count()
    }
}

/// All static classification data, injectable as one unit.
///
/// Declaration order of `signatures` is the tie-break order.
#[derive(Debug, Clone)]
pub struct SignatureTable {
    pub signatures: Vec<DocumentSignature>,
    /// Checked in order; first one that fired becomes the lab sub-type.
    pub lab_sub_types: Vec<&'static str>,
    /// Per-type keywords reported in `document_sections` when present.
    pub section_keywords: Vec<(&'static str, Vec<&'static str>)>,
    /// Per-type filename patterns used by `enhance_classification`.
    pub filename_patterns: Vec<(&'static str, Vec<Regex>)>,
}

impl SignatureTable {
    pub fn sections_for(&self, doc_type: &str) -> &[&'static str] {
        self.section_keywords
            .iter()
            .find(|(name, _)| *name == doc_type)
            .map(|(_, keywords)| keywords.as_slice())
            .unwrap_or(&[])
    }

    pub fn filename_patterns_for(&self, doc_type: &str) -> &[Regex] {
        self.filename_patterns
            .iter()
            .find(|(name, _)| *name == doc_type)
            .map(|(_, patterns)| patterns.as_slice())
            .unwrap_or(&[])
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("Invalid signature regex pattern")
}

fn filename(name: &'static str, patterns: &[&str]) -> (&'static str, Vec<Regex>) {
    (name, patterns.iter().map(|p| compile(p)).collect())
}

/// Built-in table shared by every default classifier.
pub static DEFAULT_TABLE: LazyLock<Arc<SignatureTable>> =
    LazyLock::new(|| Arc::new(build_default_table()));

fn build_default_table() -> SignatureTable {
    let signatures = vec![
        DocumentSignature::new(
            "nutriq",
            &[
                r"nutriq\s*health\s*assessment",
                r"digestive\s*health\s*score",
                r"energy\s*metabolism\s*score",
                r"immune\s*system\s*score",
                r"mental\s*emotional\s*score",
                r"nutritional\s*therapy\s*practitioner",
            ],
            2,
        ),
        DocumentSignature::new(
            "kbmo",
            &[
                r"kbmo\s*diagnostics",
                r"food\s*sensitivity",
                r"igg\s*antibody",
                r"elimination\s*diet",
                r"food\s*sensitivity\s*test",
                r"kbma\s*report",
            ],
            2,
        ),
        DocumentSignature::new(
            "dutch",
            &[
                r"dutch\s*(complete|plus|test)",
                r"precision\s*analytical",
                r"hormone\s*test",
                r"cortisol\s*pattern",
                r"dried\s*urine",
                r"adrenal\s*assessment",
            ],
            2,
        ),
        DocumentSignature::new(
            "fitTest",
            &[
                r"fit\s*test",
                r"fecal\s*immunochemical",
                r"colorectal\s*cancer\s*screening",
                r"hemoglobin\s*detection",
                r"stool\s*test",
                r"gastrointestinal\s*bleeding",
            ],
            2,
        ),
        DocumentSignature::new(
            "spi",
            &[
                r"success\s*probability\s*index",
                r"spi\s*assessment",
                r"business\s*readiness",
                r"trucking\s*success",
                r"driver\s*assessment",
                r"0-100\s*scale",
            ],
            2,
        ),
        DocumentSignature::new(
            "cgm",
            &[
                r"continuous\s*glucose\s*monitor",
                r"cgm\s*report",
                r"glucose\s*readings",
                r"time\s*in\s*range",
                r"glucose\s*variability",
                r"average\s*glucose",
            ],
            2,
        ),
        DocumentSignature::new(
            "labReport",
            &[
                r"laboratory\s*report",
                r"lab\s*results",
                r"reference\s*range",
                r"clinical\s*laboratory",
                r"test\s*results",
                r"specimen\s*collected",
            ],
            2,
        ),
        DocumentSignature::new(
            "metabolicPanel",
            &[
                r"comprehensive\s*metabolic\s*panel",
                r"basic\s*metabolic\s*panel",
                r"cmp|bmp",
                r"glucose.*sodium.*potassium",
                r"liver\s*function",
                r"kidney\s*function",
            ],
            1,
        ),
        DocumentSignature::new(
            "thyroid",
            &[
                r"thyroid\s*(panel|test|function)",
                r"tsh.*t3.*t4",
                r"thyroid\s*stimulating\s*hormone",
                r"free\s*t[34]",
                r"reverse\s*t3",
                r"thyroid\s*antibod",
            ],
            1,
        ),
        DocumentSignature::new(
            "lipidPanel",
            &[
                r"lipid\s*panel",
                r"cholesterol\s*panel",
                r"total\s*cholesterol.*hdl.*ldl",
                r"triglycerides",
                r"cardiovascular\s*risk",
                r"lipid\s*profile",
            ],
            1,
        ),
        DocumentSignature::new(
            "inflammatoryMarkers",
            &[
                r"inflammatory\s*markers",
                r"c-reactive\s*protein",
                r"crp|hscrp",
                r"interleukin",
                r"tumor\s*necrosis\s*factor",
                r"inflammation\s*panel",
            ],
            1,
        ),
        DocumentSignature::new(
            "progressTracking",
            &[
                r"progress\s*tracking",
                r"daily\s*health\s*metrics",
                r"supplement\s*compliance",
                r"symptom\s*tracking",
                r"health\s*diary",
                r"wellness\s*log",
            ],
            2,
        ),
        DocumentSignature::new(
            "intakeForm",
            &[
                r"client\s*intake",
                r"health\s*history",
                r"medical\s*questionnaire",
                r"patient\s*information",
                r"health\s*assessment\s*form",
                r"new\s*client\s*form",
            ],
            2,
        ),
        DocumentSignature::new(
            "followUp",
            &[
                r"follow[\s-]?up\s*assessment",
                r"re[\s-]?assessment",
                r"progress\s*evaluation",
                r"comparative\s*analysis",
                r"follow[\s-]?up\s*report",
                r"reassessment\s*form",
            ],
            1,
        ),
    ];

    let section_keywords = vec![
        (
            "nutriq",
            vec![
                "digestive health",
                "energy metabolism",
                "immune system",
                "mental emotional",
                "sleep quality",
                "stress response",
            ],
        ),
        (
            "dutch",
            vec![
                "cortisol pattern",
                "sex hormones",
                "organic acids",
                "neurotransmitters",
                "melatonin",
                "oxidative stress",
            ],
        ),
        (
            "kbmo",
            vec![
                "high reactivity",
                "moderate reactivity",
                "low reactivity",
                "no reactivity",
                "food groups",
                "clinical considerations",
            ],
        ),
        (
            "labReport",
            vec![
                "chemistry panel",
                "hematology",
                "urinalysis",
                "hormones",
                "vitamins",
                "minerals",
                "inflammatory markers",
                "cardiovascular markers",
            ],
        ),
    ];

    let filename_patterns = vec![
        filename("nutriq", &[r"nutriq", r"health.*assessment"]),
        filename("kbmo", &[r"kbmo", r"food.*sensitivity"]),
        filename("dutch", &[r"dutch", r"hormone"]),
        filename("fitTest", &[r"fit.*test"]),
        filename("spi", &[r"spi", r"success.*probability"]),
        filename("cgm", &[r"cgm", r"glucose"]),
        filename("labReport", &[r"lab.*report", r"laboratory"]),
    ];

    SignatureTable {
        signatures,
        lab_sub_types: vec!["metabolicPanel", "thyroid", "lipidPanel", "inflammatoryMarkers"],
        section_keywords,
        filename_patterns,
    }
}
