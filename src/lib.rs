pub mod config;
pub mod models;
pub mod pipeline; // Classification, extraction, scoring, protocol parsing

pub use pipeline::assessment::{NaqAnalysis, NaqAnalyzer, NaqResponses, SymptomBurdenAnalysis};
pub use pipeline::classification::{Classification, DocumentClassifier};
pub use pipeline::extraction::{ExtractedLabData, LabDocumentProcessor, LabValueExtractor};
pub use pipeline::processor::{DocumentProcessor, ProcessedDocument, Route};
pub use pipeline::protocol::{parse_protocol, ParsedProtocol};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Reads `RUST_LOG`, falling back to [`config::default_log_filter`].
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
    {
        tracing::info!("{} v{} tracing initialised", config::APP_NAME, config::APP_VERSION);
    }
}
