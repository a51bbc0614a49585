//! Static NAQ section table: sizes, question ranges, interpretation text and
//! recommendations. Adding a section is a table edit.

use crate::models::Severity;

/// Every NAQ question is answered on a 0-3 scale.
pub const POINTS_PER_QUESTION: f64 = 3.0;

/// Max score for a section missing from the table.
pub const DEFAULT_MAX_SCORE: f64 = 30.0;

pub const MAX_RECOMMENDATIONS: usize = 5;
pub const PRIMARY_SYSTEM_COUNT: usize = 3;

pub const MAINTENANCE_RECOMMENDATION: &str = "Continue current health maintenance protocols";

/// Interpretation text indexed by severity: critical, high, moderate, low.
pub type Interpretations = [&'static str; 4];

pub const GENERIC_INTERPRETATIONS: Interpretations = [
    "Severe dysfunction in this system",
    "Significant issues requiring attention",
    "Mild concerns to monitor",
    "System functioning well",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionDef {
    pub name: &'static str,
    pub question_count: u32,
    /// Inclusive question-number range; `None` when the section is only ever
    /// supplied as a pre-aggregated total.
    pub questions: Option<(u32, u32)>,
    pub interpretations: Option<Interpretations>,
    /// Added when the section is high or critical.
    pub recommendation: Option<&'static str>,
}

impl SectionDef {
    pub fn max_score(&self) -> f64 {
        self.question_count as f64 * POINTS_PER_QUESTION
    }

    pub fn interpretation(&self, severity: Severity) -> &'static str {
        interpretation_for(self.interpretations.as_ref(), severity)
    }
}

fn interpretation_for(table: Option<&Interpretations>, severity: Severity) -> &'static str {
    let texts = table.unwrap_or(&GENERIC_INTERPRETATIONS);
    match severity {
        Severity::Critical => texts[0],
        Severity::High => texts[1],
        Severity::Moderate => texts[2],
        Severity::Low => texts[3],
    }
}

const fn section(
    name: &'static str,
    question_count: u32,
    questions: Option<(u32, u32)>,
    interpretations: Option<Interpretations>,
    recommendation: Option<&'static str>,
) -> SectionDef {
    SectionDef {
        name,
        question_count,
        questions,
        interpretations,
        recommendation,
    }
}

/// Declaration order is the derivation order and the tie-break order.
pub const NAQ_SECTIONS: &[SectionDef] = &[
    section(
        "Upper Gastrointestinal",
        18,
        Some((52, 70)),
        Some([
            "Severe digestive dysfunction, likely low stomach acid",
            "Significant digestive issues, possible hypochlorhydria",
            "Mild digestive concerns, monitor closely",
            "Normal digestive function",
        ]),
        Some("Consider digestive enzyme support and betaine HCl"),
    ),
    section(
        "Liver & Gallbladder",
        25,
        Some((71, 98)),
        Some([
            "Severe hepatobiliary dysfunction, immediate attention needed",
            "Significant liver/gallbladder stress",
            "Mild hepatic burden, support detoxification",
            "Good liver function",
        ]),
        Some("Support liver detoxification pathways, consider bile support"),
    ),
    section("Small Intestine", 17, Some((99, 115)), None, None),
    section("Large Intestine", 19, Some((116, 135)), None, None),
    section(
        "Mineral Needs",
        29,
        Some((136, 164)),
        None,
        Some("Comprehensive mineral supplementation recommended"),
    ),
    section(
        "Essential Fatty Acids",
        8,
        Some((165, 172)),
        None,
        Some("Increase omega-3 fatty acid intake"),
    ),
    section(
        "Sugar Handling",
        13,
        Some((173, 185)),
        Some([
            "Severe blood sugar dysregulation, pre-diabetic risk",
            "Significant glucose metabolism issues",
            "Mild blood sugar instability",
            "Good metabolic function",
        ]),
        Some("Implement blood sugar stabilization protocol"),
    ),
    section("Vitamin Need", 27, Some((186, 212)), None, None),
    section(
        "Adrenal",
        26,
        Some((213, 238)),
        Some([
            "Severe adrenal dysfunction, burnout risk",
            "Significant stress response dysfunction",
            "Mild adrenal stress",
            "Healthy stress response",
        ]),
        Some("Adrenal support protocol with adaptogenic herbs"),
    ),
    section("Pituitary", 13, Some((239, 251)), None, None),
    section("Thyroid", 16, Some((252, 267)), None, None),
    section("Female Reproductive", 20, Some((277, 296)), None, None),
    section("Male Hormonal", 10, None, None, None),
    section("Cardiovascular", 10, Some((297, 306)), None, None),
    section("Kidney & Bladder", 5, Some((307, 311)), None, None),
    section("Immune System", 7, Some((312, 318)), None, None),
];

pub fn find_section<'a>(table: &'a [SectionDef], name: &str) -> Option<&'a SectionDef> {
    table.iter().find(|s| s.name == name)
}

/// Max score, falling back to [`DEFAULT_MAX_SCORE`] for unknown sections.
pub fn max_score_for(table: &[SectionDef], name: &str) -> f64 {
    find_section(table, name).map_or(DEFAULT_MAX_SCORE, SectionDef::max_score)
}

/// Section-specific text, or the generic sentence for unknown sections.
pub fn interpretation_of(table: &[SectionDef], name: &str, severity: Severity) -> &'static str {
    match find_section(table, name) {
        Some(def) => def.interpretation(severity),
        None => interpretation_for(None, severity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_scores() {
        assert_eq!(max_score_for(NAQ_SECTIONS, "Upper Gastrointestinal"), 54.0);
        assert_eq!(max_score_for(NAQ_SECTIONS, "Adrenal"), 78.0);
        assert_eq!(max_score_for(NAQ_SECTIONS, "Kidney & Bladder"), 15.0);
        assert_eq!(max_score_for(NAQ_SECTIONS, "Male Hormonal"), 30.0);
        assert_eq!(max_score_for(NAQ_SECTIONS, "Sleep"), DEFAULT_MAX_SCORE);
    }

    #[test]
    fn question_ranges_do_not_overlap() {
        let mut ranges: Vec<(u32, u32)> = NAQ_SECTIONS.iter().filter_map(|s| s.questions).collect();
        ranges.sort();
        for w in ranges.windows(2) {
            assert!(w[0].1 < w[1].0, "{:?} overlaps {:?}", w[0], w[1]);
        }
        for (start, end) in ranges {
            assert!(start <= end);
        }
    }

    #[test]
    fn names_unique() {
        for (i, a) in NAQ_SECTIONS.iter().enumerate() {
            for b in &NAQ_SECTIONS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn bespoke_and_generic_interpretations() {
        assert_eq!(
            interpretation_of(NAQ_SECTIONS, "Adrenal", Severity::Moderate),
            "Mild adrenal stress"
        );
        assert_eq!(
            interpretation_of(NAQ_SECTIONS, "Thyroid", Severity::Critical),
            "Severe dysfunction in this system"
        );
        assert_eq!(
            interpretation_of(NAQ_SECTIONS, "Unlisted", Severity::Low),
            "System functioning well"
        );
    }
}
