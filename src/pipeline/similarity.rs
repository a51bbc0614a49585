//! Normalized edit-distance similarity.
//!
//! Callers lowercase both inputs; comparison here is exact per `char`.

/// Narrow seam for fuzzy name matching so the distance algorithm can be
/// swapped without touching callers.
pub trait StringSimilarity: Send + Sync {
    /// Score in `[0, 1]`; 1.0 means identical.
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Classic dynamic-programming Levenshtein (insert/delete/substitute cost 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl StringSimilarity for Levenshtein {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        similarity(a, b)
    }
}

/// Same metric computed by the `strsim` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrsimLevenshtein;

impl StringSimilarity for StrsimLevenshtein {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }
}

/// `(maxLen - editDistance) / maxLen`, with `similarity("", "") == 1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = edit_distance(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Levenshtein edit distance over Unicode scalar values, two-row DP.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 { return n; }
    if n == 0 { return m; }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = if a_ch == b_ch { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
