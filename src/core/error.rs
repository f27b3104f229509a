use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::tedb::FetchError;

/// Errors that abort a sync run.
///
/// Each variant names the pipeline stage that failed. Nothing is retried;
/// the error travels unchanged up to the command line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    /// The TEDB request could not be completed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The TEDB reply did not have the structure the mapper expects.
    #[error("mapping failed: {0}")]
    Mapping(#[from] MappingError),

    /// One of the output files could not be written.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

/// Structural problems in the raw TEDB document.
///
/// Individual malformed entries are skipped, not reported here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MappingError {
    /// An expected top-level element is absent.
    #[error("missing section '{section}' in TEDB response")]
    MissingSection {
        /// Local name of the missing element.
        section: &'static str,
    },

    /// A label is present but not in the translation table.
    #[error("unknown {field} label '{value}' in vatRateResults entry #{entry}")]
    UnknownLabel {
        /// Upstream field path (e.g. "rate/type").
        field: &'static str,
        /// The unrecognised label.
        value: String,
        /// Zero-based position of the entry in the response.
        entry: usize,
    },
}

/// Which output file a render error concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// The machine-readable dataset.
    Json,
    /// The human-readable report.
    Markdown,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON dataset"),
            Self::Markdown => f.write_str("Markdown report"),
        }
    }
}

/// Failure while writing one of the outputs.
#[derive(Debug, Error)]
#[error("writing {output} to {} failed: {source}", .path.display())]
pub struct RenderError {
    /// The output being written.
    pub output: OutputKind,
    /// Target path.
    pub path: PathBuf,
    /// Underlying I/O or serialization error.
    #[source]
    pub source: std::io::Error,
}

impl RenderError {
    pub(crate) fn new(output: OutputKind, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            output,
            path: path.into(),
            source,
        }
    }
}
