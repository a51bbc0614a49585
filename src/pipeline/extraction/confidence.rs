/// Confidence thresholds used by the extraction pipeline
pub mod thresholds {
    /// Test rows at or below this name confidence are dropped.
    pub const MIN_TEST_RESULT: f32 = 0.30;

    /// Normalized name equals a vocabulary entry (case-insensitive).
    pub const EXACT_NAME: f32 = 1.0;

    /// Name contains, or is contained in, a vocabulary entry.
    pub const CONTAINED_NAME: f32 = 0.8;

    /// Direct PDF text long enough to trust.
    pub const PDF_TEXT_TRUSTED: f32 = 0.9;

    /// Direct PDF text that is suspiciously short.
    pub const PDF_TEXT_SHORT: f32 = 0.5;

    /// Plain UTF-8 text handed in by the caller.
    pub const PLAIN_TEXT: f32 = 0.99;
}

/// Confidence for directly extracted PDF text of `text_len` characters.
pub fn direct_text_confidence(text_len: usize, min_chars: usize) -> f32 {
    if text_len > min_chars {
        thresholds::PDF_TEXT_TRUSTED
    } else {
        thresholds::PDF_TEXT_SHORT
    }
}

/// Strict floor: exactly [`thresholds::MIN_TEST_RESULT`] is dropped.
pub fn passes_result_floor(confidence: f32) -> bool {
    confidence > thresholds::MIN_TEST_RESULT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_direct_text_is_trusted() {
        assert_eq!(direct_text_confidence(101, 100), 0.9);
        assert_eq!(direct_text_confidence(5_000, 100), 0.9);
    }

    #[test]
    fn short_direct_text_is_doubted() {
        assert_eq!(direct_text_confidence(100, 100), 0.5);
        assert_eq!(direct_text_confidence(0, 100), 0.5);
    }

    #[test]
    fn floor_is_strict() {
        assert!(!passes_result_floor(0.3));
        assert!(!passes_result_floor(0.1));
        assert!(passes_result_floor(0.31));
        assert!(passes_result_floor(1.0));
    }

    #[test]
    fn threshold_constants_are_ordered() {
        assert!(thresholds::MIN_TEST_RESULT < thresholds::PDF_TEXT_SHORT);
        assert!(thresholds::PDF_TEXT_SHORT < thresholds::CONTAINED_NAME);
        assert!(thresholds::CONTAINED_NAME < thresholds::PDF_TEXT_TRUSTED);
        assert!(thresholds::PDF_TEXT_TRUSTED < thresholds::EXACT_NAME);
    }
}
