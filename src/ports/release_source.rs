use std::path::Path;

use crate::domain::AppError;

/// Source of pre-built release archives.
pub trait ReleaseSource {
    /// Download the release for `version` and extract it into `dest`.
    ///
    /// Must not touch anything outside `dest`.
    fn fetch(&self, version: &str, dest: &Path) -> Result<(), AppError>;
}
