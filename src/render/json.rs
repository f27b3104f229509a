use std::io;
use std::path::Path;

use tracing::debug;

use super::write_atomic;
use crate::core::{OutputKind, RenderError, VatDataset};

/// Serialize the dataset as pretty-printed JSON with a trailing newline.
///
/// Field order follows the struct definitions and rates are written as
/// decimal strings, so equal datasets always produce identical bytes.
pub fn to_json_string(dataset: &VatDataset) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(dataset)?;
    out.push('\n');
    Ok(out)
}

/// Write the dataset to `path`, replacing any previous file.
pub fn write_json(dataset: &VatDataset, path: &Path) -> Result<(), RenderError> {
    let body = to_json_string(dataset)
        .map_err(|e| RenderError::new(OutputKind::Json, path, io::Error::other(e)))?;
    write_atomic(path, body.as_bytes())
        .map_err(|e| RenderError::new(OutputKind::Json, path, e))?;
    debug!(path = %path.display(), bytes = body.len(), "wrote JSON dataset");
    Ok(())
}
