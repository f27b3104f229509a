use std::path::PathBuf;
use std::time::Duration;

/// Default TEDB VAT retrieval SOAP endpoint.
pub const DEFAULT_TEDB_ENDPOINT: &str =
    "https://ec.europa.eu/taxation_customs/tedb/ws/VatRetrievalService";

/// Default location of the JSON dataset.
pub const DEFAULT_JSON_PATH: &str = "data/parsed/latest.json";

/// Default location of the Markdown report.
pub const DEFAULT_MARKDOWN_PATH: &str = "docs/eu-vat-rates-and-categories-dataset.md";

/// Length of the trailing fetch window, in days.
pub const DEFAULT_WINDOW_DAYS: u64 = 90;

/// Settings for a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// TEDB SOAP endpoint URL.
    pub endpoint: String,
    /// Upper bound for the whole HTTP exchange.
    pub timeout: Duration,
    /// Length of the trailing fetch window ending today.
    pub window_days: u64,
    /// Where the outputs go.
    pub outputs: OutputPaths,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TEDB_ENDPOINT.into(),
            timeout: Duration::from_secs(60),
            window_days: DEFAULT_WINDOW_DAYS,
            outputs: OutputPaths::default(),
        }
    }
}

/// Output file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// JSON dataset path.
    pub json: PathBuf,
    /// Markdown report path.
    pub markdown: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            json: DEFAULT_JSON_PATH.into(),
            markdown: DEFAULT_MARKDOWN_PATH.into(),
        }
    }
}
