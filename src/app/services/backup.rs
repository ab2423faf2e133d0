//! Configuration backups kept inside an installation.
//!
//! Snapshots go to `<target>/_backup`. While the target is replaced the
//! whole backup directory is parked in a hidden sibling of the target and
//! copied back afterwards.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::AppError;
use crate::domain::backup::{BackupTag, backup_file_name, holding_dir_name};

/// Copy every existing `source` into `backup_dir`, tagged with `tag`.
///
/// Sources that do not exist are skipped. An existing backup is never
/// overwritten; later copies get a numeric suffix instead.
pub fn snapshot(
    sources: &[&Path],
    backup_dir: &Path,
    tag: &BackupTag,
) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::new();

    for source in sources {
        if !source.is_file() {
            tracing::debug!(source = %source.display(), "no file to back up");
            continue;
        }
        fs::create_dir_all(backup_dir)?;

        let destination = (1..)
            .map(|attempt| backup_dir.join(backup_file_name(source, tag, attempt)))
            .find(|candidate| !candidate.exists())
            .ok_or_else(|| AppError::Validation("No free backup file name".to_string()))?;

        fs::copy(source, &destination)?;
        tracing::info!(from = %source.display(), to = %destination.display(), "backed up");
        written.push(destination);
    }

    Ok(written)
}

/// Park `backup_dir` next to the installation it belongs to.
///
/// Returns the holding location, or `None` when there is nothing to park.
pub fn relocate(backup_dir: &Path, stamp: &BackupTag) -> Result<Option<PathBuf>, AppError> {
    if !backup_dir.is_dir() {
        return Ok(None);
    }

    let target = backup_dir.parent().ok_or_else(|| {
        AppError::Validation(format!("{} has no parent directory", backup_dir.display()))
    })?;
    let target_name = target.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let parent = target.parent().unwrap_or_else(|| Path::new("."));

    let base = holding_dir_name(&target_name, stamp);
    let holding = (1..)
        .map(|attempt| match attempt {
            1 => parent.join(&base),
            n => parent.join(format!("{}-{}", base, n)),
        })
        .find(|candidate| !candidate.exists())
        .ok_or_else(|| AppError::Validation("No free holding directory name".to_string()))?;

    copy_tree(backup_dir, &holding)?;
    tracing::info!(holding = %holding.display(), "backups parked");
    Ok(Some(holding))
}

/// Copy the parked backups into `backup_dir`, then drop the holding copy.
pub fn restore(holding: &Path, backup_dir: &Path) -> Result<(), AppError> {
    copy_tree(holding, backup_dir)?;
    fs::remove_dir_all(holding)?;
    tracing::info!(backup_dir = %backup_dir.display(), "backups restored");
    Ok(())
}

/// Recursively copy `src` into `dst`, creating `dst` as needed.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dst)?;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry.path().strip_prefix(src).map_err(|e| {
            AppError::Io(io::Error::other(format!("{}: {}", entry.path().display(), e)))
        })?;
        if relative.as_os_str().is_empty() {
            continue;
        }

        let out = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&out)?;
        } else {
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &out)?;
        }
    }
    Ok(())
}
