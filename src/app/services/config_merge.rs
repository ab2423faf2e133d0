//! Merge an old configuration into a configuration file on disk.

use std::path::Path;

use crate::domain::merge::all_misses;
use crate::domain::{AppError, JsonDocument, MergeMiss, merge_documents};

/// Merge `old` into the file at `new_path` and return the misses.
///
/// The file is written once. A missing file is left alone and every leaf of
/// `old` is reported as a miss.
pub fn merge_into_file(old: &JsonDocument, new_path: &Path) -> Result<Vec<MergeMiss>, AppError> {
    if !new_path.is_file() {
        tracing::warn!(path = %new_path.display(), "no configuration to merge into");
        return Ok(all_misses(old));
    }

    let new = JsonDocument::read(new_path)?;
    let outcome = merge_documents(old, &new)?;
    outcome.document.write(new_path)?;

    tracing::debug!(
        path = %new_path.display(),
        misses = outcome.misses.len(),
        "merged previous configuration"
    );
    Ok(outcome.misses)
}
