//! Release archive naming and version lists.

use std::cmp::Ordering;

use url::Url;

use crate::domain::AppError;
use crate::domain::version::Version;

/// Download URL of a pre-built release archive.
///
/// `<base>/releases/download/v<version>/<project>.build.refs.tags.v<version>.zip`
pub fn archive_url(base: &Url, project: &str, version: &str) -> Result<Url, AppError> {
    let version = version.trim().trim_start_matches('v');
    let raw = format!(
        "{}/releases/download/v{}/{}.build.refs.tags.v{}.zip",
        base.as_str().trim_end_matches('/'),
        version,
        project,
        version
    );
    Url::parse(&raw).map_err(|err| AppError::InvalidConfig(format!("Invalid release URL: {}", err)))
}

/// Version strings sorted ascending; unparsable entries keep their relative
/// order in front.
pub fn sort_versions(mut versions: Vec<String>) -> Vec<String> {
    versions.sort_by(|left, right| match (Version::parse(left), Version::parse(right)) {
        (Some(l), Some(r)) => l.cmp(&r),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    versions
}

/// The most recent `count` versions, newest first.
pub fn recent_versions(versions: &[String], count: usize) -> Vec<String> {
    versions.iter().rev().take(count).cloned().collect()
}
