//! Post-OCR correction of lab terminology.
//!
//! A word is replaced only when it is at least [`MIN_WORD_LEN`] characters
//! long and exactly one dictionary term lies within [`MAX_DISTANCE`] edits.

use crate::pipeline::similarity::edit_distance;

pub const MIN_WORD_LEN: usize = 5;
pub const MAX_DISTANCE: usize = 2;

/// Lower-case, sorted (binary search).
pub const LAB_TERMS: &[&str] = &[
    "albumin",
    "alkaline",
    "bilirubin",
    "calcium",
    "chloride",
    "cholesterol",
    "cortisol",
    "creatinine",
    "estradiol",
    "ferritin",
    "glucose",
    "hematocrit",
    "hemoglobin",
    "homocysteine",
    "insulin",
    "lymphocytes",
    "magnesium",
    "monocytes",
    "neutrophils",
    "phosphorus",
    "platelets",
    "potassium",
    "progesterone",
    "protein",
    "sodium",
    "testosterone",
    "thyroxine",
    "transferrin",
    "triglycerides",
    "triiodothyronine",
    "vitamin",
];

/// Corrected text plus how many words changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectedText {
    pub text: String,
    pub corrections: usize,
}

/// Correct near-miss lab terms in OCR output, preserving case and all
/// non-alphanumeric characters.
pub fn correct_medical_terms(text: &str) -> CorrectedText {
    correct_with_terms(text, LAB_TERMS)
}

fn correct_with_terms(text: &str, terms: &[&str]) -> CorrectedText {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    let mut corrections = 0;

    let mut flush = |word: &mut String, out: &mut String| {
        if word.is_empty() {
            return;
        }
        match correct_word(word, terms) {
            Some(fixed) => {
                corrections += 1;
                out.push_str(&fixed);
            }
            None => out.push_str(word),
        }
        word.clear();
    };

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            word.push(ch);
        } else {
            flush(&mut word, &mut out);
            out.push(ch);
        }
    }
    flush(&mut word, &mut out);

    CorrectedText { text: out, corrections }
}

/// `Some(replacement)` when the word should change.
fn correct_word(word: &str, terms: &[&str]) -> Option<String> {
    let len = word.chars().count();
    if len < MIN_WORD_LEN {
        return None;
    }

    let lower = word.to_lowercase();
    if terms.binary_search(&lower.as_str()).is_ok() {
        return None;
    }

    let mut best: Option<(&str, usize)> = None;
    let mut ambiguous = false;

    for &term in terms {
        if len.abs_diff(term.chars().count()) > MAX_DISTANCE {
            continue;
        }
        let dist = edit_distance(&lower, term);
        if dist > MAX_DISTANCE {
            continue;
        }
        match best {
            Some((_, d)) if dist == d => ambiguous = true,
            Some((_, d)) if dist > d => {}
            _ => {
                best = Some((term, dist));
                ambiguous = false;
            }
        }
    }

    match best {
        Some((term, _)) if !ambiguous => Some(match_case(word, term)),
        _ => None,
    }
}

fn match_case(original: &str, replacement: &str) -> String {
    let letters = || original.chars().filter(|c| c.is_alphabetic());
    if letters().all(char::is_uppercase) {
        return replacement.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
    }
    replacement.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(text: &str) -> String {
        correct_medical_terms(text).text
    }

    #[test]
    fn terms_sorted_and_lowercase() {
        for w in LAB_TERMS.windows(2) {
            assert!(w[0] < w[1], "{:?} >= {:?}", w[0], w[1]);
        }
        assert!(LAB_TERMS.iter().all(|t| t.chars().all(|c| !c.is_uppercase())));
    }

    #[test]
    fn corrects_single_character_ocr_errors() {
        assert_eq!(fix("Glucosc"), "Glucose");
        assert_eq!(fix("Creatiniue"), "Creatinine");
        assert_eq!(fix("Ferritln"), "Ferritin");
        assert_eq!(fix("hemoglobln"), "hemoglobin");
    }

    #[test]
    fn corrects_transposition_within_two_edits() {
        assert_eq!(fix("Protien"), "Protein");
    }

    #[test]
    fn preserves_upper_case() {
        assert_eq!(fix("TRIGLYCERIDFS"), "TRIGLYCERIDES");
    }

    #[test]
    fn leaves_known_and_short_words() {
        assert_eq!(fix("Ferritin"), "Ferritin");
        assert_eq!(fix("TSH LDL HDL"), "TSH LDL HDL");
    }

    #[test]
    fn leaves_unrelated_words() {
        let text = "Patient fasting specimen collected morning";
        let out = correct_medical_terms(text);
        assert_eq!(out.text, text);
        assert_eq!(out.corrections, 0);
    }

    #[test]
    fn keeps_numbers_and_punctuation() {
        let out = correct_medical_terms("Glucosc 95 mg/dL 70-99\nSodiun: 139 (135-145)");
        assert_eq!(out.text, "Glucose 95 mg/dL 70-99\nSodium: 139 (135-145)");
        assert_eq!(out.corrections, 2);
    }

    #[test]
    fn ambiguous_candidates_are_left_alone() {
        let out = correct_with_terms("abcdex", &["abcdef", "abcdeg"]);
        assert_eq!(out.text, "abcdex");
        assert_eq!(out.corrections, 0);
    }

    #[test]
    fn closer_term_beats_earlier_tie() {
        // Distance 2 to the first term, 1 to the second
        let out = correct_with_terms("abcxyz", &["abcdez", "abcxyw"]);
        assert_eq!(out.text, "abcxyw");
    }
}
