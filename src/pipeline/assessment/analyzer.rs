use super::sections::{
    interpretation_of, max_score_for, SectionDef, MAINTENANCE_RECOMMENDATION,
    MAX_RECOMMENDATIONS, NAQ_SECTIONS, PRIMARY_SYSTEM_COUNT,
};
use super::types::{DataQualityWarning, NaqAnalysis, NaqResponses, SectionScore};
use crate::models::Severity;

/// Score a section against an explicit maximum.
///
/// Interpretation text comes from the built-in section table.
pub fn section_score(section_name: &str, score: f64, max_possible: f64) -> SectionScore {
    build_score(NAQ_SECTIONS, section_name, score, max_possible)
}

fn build_score(
    table: &[SectionDef],
    section_name: &str,
    score: f64,
    max_possible: f64,
) -> SectionScore {
    let percentage = if max_possible > 0.0 {
        score / max_possible * 100.0
    } else {
        0.0
    };
    let severity = Severity::from_percentage(percentage);
    SectionScore {
        section_name: section_name.to_string(),
        score,
        max_possible,
        percentage,
        severity,
        interpretation: interpretation_of(table, section_name, severity).to_string(),
    }
}

/// Nutritional Assessment Questionnaire scorer.
#[derive(Debug, Clone, Copy)]
pub struct NaqAnalyzer {
    table: &'static [SectionDef],
}

impl Default for NaqAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl NaqAnalyzer {
    pub fn new() -> Self {
        Self {
            table: NAQ_SECTIONS,
        }
    }

    pub fn with_table(table: &'static [SectionDef]) -> Self {
        Self { table }
    }

    pub fn analyze(&self, responses: &NaqResponses) -> NaqAnalysis {
        let totals = self.section_totals(responses);

        let mut warnings = Vec::new();
        let mut sections: Vec<SectionScore> = totals
            .into_iter()
            .map(|(name, score)| {
                let max = max_score_for(self.table, &name);
                let scored = build_score(self.table, &name, score, max);
                if scored.score > scored.max_possible {
                    tracing::warn!(
                        section = %scored.section_name,
                        score = scored.score,
                        max_possible = scored.max_possible,
                        percentage = scored.percentage,
                        "Section score exceeds its maximum"
                    );
                    warnings.push(DataQualityWarning::ScoreExceedsMaximum {
                        section: scored.section_name.clone(),
                        score: scored.score,
                        max_possible: scored.max_possible,
                        percentage: scored.percentage,
                    });
                }
                scored
            })
            .collect();

        // Stable: equal percentages keep table/storage order
        sections.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        let top_concerns: Vec<String> = sections
            .iter()
            .filter(|s| s.severity.is_concern())
            .map(|s| s.section_name.clone())
            .collect();
        let primary_systems = top_concerns.iter().take(PRIMARY_SYSTEM_COUNT).cloned().collect();
        let total_score = sections.iter().map(|s| s.score).sum();
        let recommendations = self.recommendations(&sections);

        tracing::info!(
            sections = sections.len(),
            concerns = top_concerns.len(),
            warnings = warnings.len(),
            "NAQ analyzed"
        );

        NaqAnalysis {
            total_score,
            sections,
            top_concerns,
            primary_systems,
            recommendations,
            warnings,
        }
    }

    /// Pre-aggregated totals when present, otherwise sums over each
    /// section's question range. Missing questions count as zero.
    fn section_totals(&self, responses: &NaqResponses) -> Vec<(String, f64)> {
        if responses.has_section_totals() {
            return responses.section_totals.clone();
        }

        self.table
            .iter()
            .filter_map(|def| {
                let (start, end) = def.questions?;
                let total: f64 = responses.question_scores.range(start..=end).map(|(_, v)| v).sum();
                Some((def.name.to_string(), total))
            })
            .collect()
    }

    fn recommendations(&self, sorted: &[SectionScore]) -> Vec<String> {
        let mut recs: Vec<String> = sorted
            .iter()
            .filter(|s| s.severity.is_concern())
            .filter_map(|s| {
                self.table
                    .iter()
                    .find(|def| def.name == s.section_name)
                    .and_then(|def| def.recommendation)
            })
            .map(str::to_string)
            .take(MAX_RECOMMENDATIONS)
            .collect();

        if recs.is_empty() {
            recs.push(MAINTENANCE_RECOMMENDATION.to_string());
        }
        recs
    }
}
