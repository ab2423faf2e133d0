//! Naming rules for configuration backups.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Directory inside an installation that holds configuration backups.
pub const BACKUP_DIR: &str = "_backup";

/// How the tag of a backup run is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStrategy {
    /// Timestamp of the run.
    #[default]
    Date,
    /// Version pinned by the previous installation.
    Version,
}

/// Discriminator that keeps backups of different runs apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackupTag(String);

impl BackupTag {
    pub fn new(value: &str) -> Result<Self, AppError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("Backup tag must not be empty".to_string()));
        }
        if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
            return Err(AppError::Validation(format!(
                "Backup tag '{}' must not contain path separators",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Tag from a version string, normalized to a leading `v`.
    pub fn from_version(version: &str) -> Result<Self, AppError> {
        let version = version.trim();
        let version = version.strip_prefix('v').unwrap_or(version);
        Self::new(&format!("v{}", version))
    }

    /// Tag from a point in time, e.g. `20261019-101500`.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(at.format("%Y%m%d-%H%M%S").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackupTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backup file name for `original`, e.g. `conjoon.conf.json` + `v1.0.0`
/// gives `conjoon.conf.v1.0.0.json`.
///
/// `attempt` starts at 1; later attempts get a `-<attempt>` suffix so an
/// existing backup is never overwritten.
pub fn backup_file_name(original: &Path, tag: &BackupTag, attempt: u32) -> String {
    let file_name = original.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), Some(ext.to_string())),
        _ => (file_name.to_string(), None),
    };

    let discriminator =
        if attempt <= 1 { tag.to_string() } else { format!("{}-{}", tag, attempt) };

    match extension {
        Some(ext) => format!("{}.{}.{}", stem, discriminator, ext),
        None => format!("{}.{}", stem, discriminator),
    }
}

/// Name of the holding directory used while the installation is replaced.
pub fn holding_dir_name(target_name: &str, stamp: &BackupTag) -> String {
    format!(".{}.{}.{}", target_name, BACKUP_DIR, stamp)
}
