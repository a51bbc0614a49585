use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Library-level constants
pub const APP_NAME: &str = "clinidoc";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default OCR wall-clock budget per document.
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 30;

/// Direct PDF text shorter than this is treated as a scanned PDF.
pub const DEFAULT_SCANNED_PDF_MIN_CHARS: usize = 100;

const ENV_OCR_TIMEOUT: &str = "CLINIDOC_OCR_TIMEOUT_SECS";
const ENV_SCANNED_MIN_CHARS: &str = "CLINIDOC_SCANNED_PDF_MIN_CHARS";
const ENV_TERM_CORRECTION: &str = "CLINIDOC_OCR_TERM_CORRECTION";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "clinidoc=debug,warn"
    } else {
        "clinidoc=info,warn"
    }
}

/// Runtime knobs for the source-document boundary.
///
/// Scoring thresholds and pattern tables are deliberately not here: they are
/// fixed constants of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Caller-side budget for a single OCR invocation.
    pub ocr_timeout: Duration,
    /// Direct PDF text below this length falls back to OCR.
    pub scanned_pdf_min_chars: usize,
    /// Fix near-miss medical terms in OCR output before parsing.
    pub apply_ocr_term_correction: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ocr_timeout: Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS),
            scanned_pdf_min_chars: DEFAULT_SCANNED_PDF_MIN_CHARS,
            apply_ocr_term_correction: true,
        }
    }
}

impl PipelineConfig {
    /// Build from `CLINIDOC_*` environment variables, keeping defaults for
    /// anything absent or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64>(&lookup, ENV_OCR_TIMEOUT) {
            config.ocr_timeout = Duration::from_secs(secs);
        }
        if let Some(chars) = parse_var::<usize>(&lookup, ENV_SCANNED_MIN_CHARS) {
            config.scanned_pdf_min_chars = chars;
        }
        if let Some(enabled) = parse_var::<bool>(&lookup, ENV_TERM_CORRECTION) {
            config.apply_ocr_term_correction = enabled;
        }

        config
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}
