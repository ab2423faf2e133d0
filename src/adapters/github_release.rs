//! Release archive download using reqwest.

use std::fs;
use std::io::{self, Cursor, Read, Seek};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;
use zip::ZipArchive;

use crate::domain::AppError;
use crate::domain::configuration::ReleaseConfig;
use crate::domain::release::archive_url;
use crate::ports::ReleaseSource;

/// Downloads pre-built release archives and unpacks them.
#[derive(Debug, Clone)]
pub struct HttpReleaseSource {
    base_url: Url,
    project: String,
    client: Client,
}

impl HttpReleaseSource {
    pub fn new(config: &ReleaseConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("create-conjoon/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url: config.base_url.clone(), project: config.project.clone(), client })
    }

    fn download(&self, url: &Url) -> Result<Vec<u8>, AppError> {
        let download_error =
            |details: String| AppError::Download { url: url.to_string(), details };

        tracing::info!(url = %url, "downloading release archive");
        let response =
            self.client.get(url.clone()).send().map_err(|e| download_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(format!("HTTP {}", status)));
        }

        let bytes = response.bytes().map_err(|e| download_error(e.to_string()))?;
        tracing::debug!(bytes = bytes.len(), "archive downloaded");
        Ok(bytes.to_vec())
    }
}

impl ReleaseSource for HttpReleaseSource {
    fn fetch(&self, version: &str, dest: &Path) -> Result<(), AppError> {
        let url = archive_url(&self.base_url, &self.project, version)?;
        let bytes = self.download(&url)?;
        extract_archive(Cursor::new(bytes), dest)
    }
}

/// Unpack a zip archive into `dest`.
///
/// A single directory wrapping every entry is stripped. Entries escaping
/// `dest` reject the whole archive before anything is written.
pub fn extract_archive<R: Read + Seek>(reader: R, dest: &Path) -> Result<(), AppError> {
    let mut archive =
        ZipArchive::new(reader).map_err(|e| AppError::Archive(format!("invalid zip: {}", e)))?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| AppError::Archive(format!("unreadable entry: {}", e)))?;
        let path = entry
            .enclosed_name()
            .ok_or_else(|| AppError::Archive(format!("unsafe entry path '{}'", entry.name())))?;
        entries.push((path, entry.is_dir()));
    }

    let root = common_root(&entries);
    if let Some(root) = &root {
        tracing::debug!(root = %root.display(), "stripping archive root directory");
    }

    fs::create_dir_all(dest)?;
    for (index, (path, is_dir)) in entries.iter().enumerate() {
        let relative = match &root {
            Some(root) => path.strip_prefix(root).unwrap_or(path),
            None => path.as_path(),
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let out = dest.join(relative);
        if *is_dir {
            fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut entry = archive
            .by_index(index)
            .map_err(|e| AppError::Archive(format!("unreadable entry: {}", e)))?;
        let mut file = fs::File::create(&out)?;
        io::copy(&mut entry, &mut file)
            .map_err(|e| AppError::Archive(format!("{}: {}", path.display(), e)))?;
    }

    Ok(())
}

/// Top-level directory shared by every entry, if there is exactly one and
/// no file sits beside it.
fn common_root(entries: &[(PathBuf, bool)]) -> Option<PathBuf> {
    let mut root: Option<&std::ffi::OsStr> = None;
    for (path, is_dir) in entries {
        let mut components = path.components();
        let Some(Component::Normal(first)) = components.next() else {
            return None;
        };
        if components.next().is_none() && !is_dir {
            return None;
        }
        match root {
            Some(existing) if existing != first => return None,
            _ => root = Some(first),
        }
    }
    root.map(PathBuf::from)
}
