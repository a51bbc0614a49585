use super::types::{PriorityBuckets, SymptomBurdenAnalysis, SymptomItem};
use crate::models::Priority;

/// Items scoring at least this much are eligible for `top_symptoms`.
pub const TOP_SYMPTOM_MIN_SCORE: f64 = 6.0;
pub const MAX_TOP_SYMPTOMS: usize = 5;

/// Burden bands, checked highest first. Lower bounds are inclusive.
const BURDEN_BANDS: &[(f64, &str)] = &[
    (100.0, "Very high symptom burden - immediate intervention needed"),
    (75.0, "High symptom burden - comprehensive support required"),
    (50.0, "Moderate symptom burden - targeted interventions recommended"),
    (25.0, "Mild symptom burden - preventive measures advised"),
];

const LOW_BURDEN: &str = "Low symptom burden - maintain current protocols";

pub fn interpret_burden(total: f64) -> &'static str {
    BURDEN_BANDS
        .iter()
        .find(|(floor, _)| total >= *floor)
        .map_or(LOW_BURDEN, |&(_, text)| text)
}

pub fn analyze_symptom_burden(items: &[SymptomItem]) -> SymptomBurdenAnalysis {
    let total_burden: f64 = items.iter().map(|i| i.score).sum();

    let mut by_priority = PriorityBuckets::default();
    for item in items {
        let bucket = match item.priority {
            Some(Priority::High) => &mut by_priority.high,
            Some(Priority::Medium) => &mut by_priority.medium,
            Some(Priority::Low) => &mut by_priority.low,
            None => continue,
        };
        bucket.push(item.clone());
    }

    let mut top_symptoms: Vec<SymptomItem> = items
        .iter()
        .filter(|i| i.score >= TOP_SYMPTOM_MIN_SCORE)
        .cloned()
        .collect();
    top_symptoms.sort_by(|a, b| b.score.total_cmp(&a.score));
    top_symptoms.truncate(MAX_TOP_SYMPTOMS);

    let interpretation = interpret_burden(total_burden).to_string();
    tracing::debug!(
        items = items.len(),
        total_burden,
        top = top_symptoms.len(),
        "Symptom burden analyzed"
    );

    SymptomBurdenAnalysis {
        total_burden,
        by_priority,
        top_symptoms,
        interpretation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, score: f64, priority: &str) -> SymptomItem {
        SymptomItem::new(name, score, priority)
    }

    #[test]
    fn band_boundaries_are_inclusive() {
        assert_eq!(interpret_burden(100.0), BURDEN_BANDS[0].1);
        assert_eq!(interpret_burden(99.9), BURDEN_BANDS[1].1);
        assert_eq!(interpret_burden(75.0), BURDEN_BANDS[1].1);
        assert_eq!(interpret_burden(50.0), BURDEN_BANDS[2].1);
        assert_eq!(interpret_burden(25.0), BURDEN_BANDS[3].1);
        assert_eq!(interpret_burden(24.0), LOW_BURDEN);
        assert_eq!(interpret_burden(0.0), LOW_BURDEN);
    }

    #[test]
    fn totals_buckets_and_top() {
        let items = vec![
            item("Fatigue", 8.0, "high"),
            item("Headache", 6.0, "medium"),
            item("Bloating", 4.0, "low"),
            item("Insomnia", 9.0, "high"),
            item("Brain fog", 7.0, "unknown"),
        ];
        let a = analyze_symptom_burden(&items);

        assert_eq!(a.total_burden, 34.0);
        assert_eq!(a.interpretation, "Mild symptom burden - preventive measures advised");
        assert_eq!(a.by_priority.high.len(), 2);
        assert_eq!(a.by_priority.medium.len(), 1);
        assert_eq!(a.by_priority.low.len(), 1);

        let top: Vec<&str> = a.top_symptoms.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(top, vec!["Insomnia", "Fatigue", "Brain fog", "Headache"]);
    }

    #[test]
    fn top_symptoms_capped_and_stable() {
        let items: Vec<SymptomItem> = (0..7)
            .map(|i| item(&format!("s{i}"), 6.0, "low"))
            .collect();
        let a = analyze_symptom_burden(&items);
        let top: Vec<&str> = a.top_symptoms.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(top, vec!["s0", "s1", "s2", "s3", "s4"]);
    }

    #[test]
    fn empty_input() {
        let a = analyze_symptom_burden(&[]);
        assert_eq!(a.total_burden, 0.0);
        assert!(a.top_symptoms.is_empty());
        assert_eq!(a.interpretation, LOW_BURDEN);
    }
}
