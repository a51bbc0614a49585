//! Functional-medicine reference ranges.
//!
//! Each marker has three nested bands (conventional lab range, narrower
//! functional range, optimal band) plus optional critical cut-offs. All bounds
//! are inclusive, and a value sitting exactly on a critical cut-off is critical.

use crate::models::RangeStatus;

/// Inclusive numeric interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionalRange {
    /// Lower-case alphanumeric lookup key.
    pub key: &'static str,
    pub conventional: Band,
    pub functional: Band,
    pub optimal: Band,
    pub critical_low: Option<f64>,
    pub critical_high: Option<f64>,
}

const fn range(
    key: &'static str,
    conventional: (f64, f64),
    functional: (f64, f64),
    optimal: (f64, f64),
    critical_low: Option<f64>,
    critical_high: Option<f64>,
) -> FunctionalRange {
    FunctionalRange {
        key,
        conventional: Band::new(conventional.0, conventional.1),
        functional: Band::new(functional.0, functional.1),
        optimal: Band::new(optimal.0, optimal.1),
        critical_low,
        critical_high,
    }
}

pub const FUNCTIONAL_RANGES: &[FunctionalRange] = &[
    range("glucose", (70.0, 99.0), (83.0, 99.0), (85.0, 95.0), Some(60.0), Some(140.0)),
    range("bun", (7.0, 20.0), (12.0, 20.0), (13.0, 18.0), None, None),
    range("creatinine", (0.7, 1.3), (0.8, 1.2), (0.9, 1.1), None, Some(1.5)),
    range("totalcholesterol", (100.0, 199.0), (160.0, 200.0), (170.0, 200.0), None, None),
    range("hdl", (40.0, 60.0), (59.0, 100.0), (70.0, 85.0), Some(35.0), None),
    range("ldl", (0.0, 99.0), (0.0, 100.0), (70.0, 100.0), None, None),
    range("triglycerides", (0.0, 149.0), (0.0, 100.0), (50.0, 90.0), None, Some(200.0)),
    range("tsh", (0.4, 4.0), (1.8, 3.0), (2.0, 2.5), None, None),
    range("freet4", (0.8, 1.8), (1.0, 1.5), (1.1, 1.4), None, None),
    range("freet3", (2.3, 4.2), (3.0, 4.0), (3.2, 3.8), None, None),
    range("vitamind", (30.0, 100.0), (50.0, 80.0), (60.0, 70.0), Some(20.0), None),
    range("vitaminb12", (200.0, 900.0), (500.0, 1000.0), (700.0, 900.0), Some(300.0), None),
    range("folate", (2.7, 17.0), (7.0, 15.0), (10.0, 15.0), Some(3.0), None),
    range("iron", (60.0, 170.0), (85.0, 130.0), (100.0, 130.0), None, None),
    range("ferritin", (15.0, 150.0), (30.0, 100.0), (50.0, 100.0), None, None),
    range("crp", (0.0, 3.0), (0.0, 1.0), (0.0, 0.5), None, Some(10.0)),
    range("esr", (0.0, 30.0), (0.0, 10.0), (0.0, 5.0), None, None),
    range("wbc", (4.0, 10.8), (5.5, 7.5), (6.0, 7.0), None, None),
    range("rbc", (4.2, 5.4), (4.2, 4.9), (4.4, 4.8), None, None),
    range("hemoglobin", (12.0, 15.5), (13.5, 15.0), (14.0, 15.0), Some(10.0), None),
    range("hematocrit", (36.0, 46.0), (40.0, 44.0), (41.0, 44.0), None, None),
    range("platelets", (150.0, 450.0), (175.0, 400.0), (200.0, 350.0), Some(100.0), Some(500.0)),
];

/// Alternate spellings mapped onto table keys.
const ALIASES: &[(&str, &str)] = &[
    ("cholesterol", "totalcholesterol"),
    ("b12", "vitaminb12"),
    ("hscrp", "crp"),
    ("folicacid", "folate"),
    ("hct", "hematocrit"),
    ("plt", "platelets"),
    ("plateletcount", "platelets"),
];

fn lookup_key(test_name: &str) -> String {
    let key: String = test_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(key)
}

/// Range entry for a (normalized) test name.
pub fn find_range(test_name: &str) -> Option<&'static FunctionalRange> {
    let key = lookup_key(test_name);
    FUNCTIONAL_RANGES.iter().find(|r| r.key == key)
}

impl FunctionalRange {
    /// Where `value` sits relative to this marker's bands.
    pub fn status(&self, value: f64) -> RangeStatus {
        if self.critical_low.is_some_and(|c| value <= c) {
            return RangeStatus::CriticalLow;
        }
        if self.critical_high.is_some_and(|c| value >= c) {
            return RangeStatus::CriticalHigh;
        }
        if self.optimal.contains(value) {
            return RangeStatus::Optimal;
        }
        if self.functional.contains(value) {
            return RangeStatus::Functional;
        }
        if value < self.functional.low {
            if value < self.conventional.low {
                RangeStatus::BelowConventional
            } else {
                RangeStatus::BelowFunctional
            }
        } else if value > self.conventional.high {
            RangeStatus::AboveConventional
        } else {
            RangeStatus::AboveFunctional
        }
    }
}

/// Functional status of a raw extracted value, when both the marker and the
/// number are recognized.
pub fn functional_status(test_name: &str, value: &str) -> Option<RangeStatus> {
    let range = find_range(test_name)?;
    let number: f64 = value.trim().parse().ok()?;
    Some(range.status(number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_nested_sensibly() {
        for r in FUNCTIONAL_RANGES {
            assert!(r.optimal.low <= r.optimal.high, "{}", r.key);
            assert!(r.functional.low <= r.functional.high, "{}", r.key);
            assert!(r.conventional.low <= r.conventional.high, "{}", r.key);
        }
    }

    #[test]
    fn keys_are_unique() {
        for (i, a) in FUNCTIONAL_RANGES.iter().enumerate() {
            for b in &FUNCTIONAL_RANGES[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn glucose_statuses() {
        let s = |v: &str| functional_status("Glucose", v);
        assert_eq!(s("90"), Some(RangeStatus::Optimal));
        assert_eq!(s("95"), Some(RangeStatus::Optimal));
        assert_eq!(s("84"), Some(RangeStatus::Functional));
        assert_eq!(s("75"), Some(RangeStatus::BelowFunctional));
        assert_eq!(s("65"), Some(RangeStatus::BelowConventional));
        assert_eq!(s("55"), Some(RangeStatus::CriticalLow));
        assert_eq!(s("120"), Some(RangeStatus::AboveConventional));
        assert_eq!(s("150"), Some(RangeStatus::CriticalHigh));
    }

    #[test]
    fn above_functional_inside_conventional() {
        // HDL functional band sits above the conventional one
        assert_eq!(functional_status("HDL", "59.5"), Some(RangeStatus::Functional));
        assert_eq!(functional_status("TSH", "3.5"), Some(RangeStatus::AboveFunctional));
        assert_eq!(functional_status("TSH", "4.5"), Some(RangeStatus::AboveConventional));
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(find_range("Cholesterol").map(|r| r.key), Some("totalcholesterol"));
        assert_eq!(find_range("B12").map(|r| r.key), Some("vitaminb12"));
        assert_eq!(find_range("hs-CRP").map(|r| r.key), Some("crp"));
        assert_eq!(find_range("Free T4").map(|r| r.key), Some("freet4"));
        assert_eq!(find_range("Vitamin D").map(|r| r.key), Some("vitamind"));
    }

    #[test]
    fn unknown_marker_or_value_yields_none() {
        assert_eq!(functional_status("Homocysteine", "8"), None);
        assert_eq!(functional_status("Hemoglobin A1c", "5.2"), None);
        assert_eq!(functional_status("Glucose", "<5"), None);
        assert_eq!(functional_status("Glucose", ""), None);
    }

    #[test]
    fn critical_cut_offs_are_inclusive() {
        assert_eq!(functional_status("Glucose", "140"), Some(RangeStatus::CriticalHigh));
        assert_eq!(functional_status("Glucose", "139.9"), Some(RangeStatus::AboveConventional));
        assert_eq!(functional_status("Glucose", "60"), Some(RangeStatus::CriticalLow));
        assert_eq!(functional_status("Glucose", "60.1"), Some(RangeStatus::BelowConventional));
        assert_eq!(functional_status("Creatinine", "1.5"), Some(RangeStatus::CriticalHigh));
    }

    #[test]
    fn blood_count_and_iron_markers() {
        assert_eq!(functional_status("Iron", "90"), Some(RangeStatus::Functional));
        assert_eq!(functional_status("Folate", "12"), Some(RangeStatus::Optimal));
        assert_eq!(functional_status("Folate", "3"), Some(RangeStatus::CriticalLow));
        assert_eq!(functional_status("WBC", "6.5"), Some(RangeStatus::Optimal));
        assert_eq!(functional_status("RBC", "5.0"), Some(RangeStatus::AboveFunctional));
        assert_eq!(functional_status("ESR", "20"), Some(RangeStatus::AboveFunctional));
        assert_eq!(functional_status("Hematocrit", "42"), Some(RangeStatus::Optimal));
        assert_eq!(functional_status("HCT", "38"), Some(RangeStatus::BelowFunctional));
    }

    #[test]
    fn platelets_are_critical_on_both_sides() {
        assert_eq!(functional_status("Platelets", "250"), Some(RangeStatus::Optimal));
        assert_eq!(functional_status("Platelet Count", "100"), Some(RangeStatus::CriticalLow));
        assert_eq!(functional_status("PLT", "500"), Some(RangeStatus::CriticalHigh));
        assert_eq!(functional_status("Platelets", "470"), Some(RangeStatus::AboveConventional));
        assert_eq!(functional_status("Platelets", "120"), Some(RangeStatus::BelowConventional));
    }

    #[test]
    fn critical_checks_precede_bands() {
        assert_eq!(functional_status("CRP", "12"), Some(RangeStatus::CriticalHigh));
        assert_eq!(functional_status("CRP", "0.3"), Some(RangeStatus::Optimal));
        assert_eq!(functional_status("Vitamin D", "15"), Some(RangeStatus::CriticalLow));
    }
}
