//! Installation choices gathered from the user.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::domain::AppError;

/// Default service base for the auth backend.
pub const DEFAULT_AUTH_URL: &str = "https://ddev-ms-email.ddev.site/rest-imapuser/api/v0";
/// Default service base for the email backend.
pub const DEFAULT_EMAIL_URL: &str = "https://ddev-ms-email.ddev.site/rest-api-email/api/v0";
/// Package that authenticates users against the auth backend.
pub const DEFAULT_AUTH_PACKAGE: &str = "extjs-app-imapuser";
/// Site name proposed when none is given.
pub const DEFAULT_SITE_NAME: &str = "conjoon";

/// Quick installs use demo data and the latest version; custom installs
/// ask for a version and backend URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallType {
    Quick,
    Custom,
}

impl InstallType {
    pub const ALL: [InstallType; 2] = [InstallType::Quick, InstallType::Custom];

    pub fn as_str(self) -> &'static str {
        match self {
            InstallType::Quick => "quick",
            InstallType::Custom => "custom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            InstallType::Quick => "Quick (with demo data)",
            InstallType::Custom => "Custom (for connecting with an available backend)",
        }
    }
}

impl FromStr for InstallType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(InstallType::Quick),
            "custom" | "detailed" => Ok(InstallType::Custom),
            other => Err(AppError::Validation(format!(
                "Invalid installation type '{}': must be quick or custom",
                other
            ))),
        }
    }
}

impl fmt::Display for InstallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the application content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleType {
    /// Installed from the package registry.
    Npm,
    /// Downloaded as a pre-built release archive.
    Release,
}

impl BundleType {
    pub const ALL: [BundleType; 2] = [BundleType::Release, BundleType::Npm];

    pub fn as_str(self) -> &'static str {
        match self {
            BundleType::Npm => "npm",
            BundleType::Release => "release",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BundleType::Npm => "npm (install package and development tools)",
            BundleType::Release => "release (pre-built archive)",
        }
    }
}

impl FromStr for BundleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(BundleType::Npm),
            "release" => Ok(BundleType::Release),
            other => Err(AppError::Validation(format!(
                "Invalid bundle type '{}': must be npm or release",
                other
            ))),
        }
    }
}

impl fmt::Display for BundleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend service bases, normalized to end with exactly one slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUrls {
    pub auth: String,
    pub email: String,
}

impl BackendUrls {
    pub fn new(auth: &str, email: &str) -> Result<Self, AppError> {
        Ok(Self { auth: normalize_service_url(auth)?, email: normalize_service_url(email)? })
    }
}

/// Validate `raw` as an absolute URL and collapse duplicate slashes after
/// the scheme, appending a single trailing slash.
pub fn normalize_service_url(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation("URL required".to_string()));
    }
    Url::parse(raw).map_err(|err| AppError::Validation(format!("Invalid URL '{}': {}", raw, err)))?;

    let with_slash = format!("{}/", raw);
    let (scheme, rest) = match with_slash.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, with_slash.as_str()),
    };

    let mut collapsed = String::with_capacity(rest.len());
    for ch in rest.chars() {
        if ch == '/' && collapsed.ends_with('/') {
            continue;
        }
        collapsed.push(ch);
    }

    Ok(match scheme {
        Some(scheme) => format!("{}://{}", scheme, collapsed),
        None => collapsed,
    })
}

/// Directory name for a site, percent-encoded like a URI component.
pub fn site_dir_name(site_name: &str) -> String {
    let mut encoded = String::with_capacity(site_name.len());
    for byte in site_name.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Default target for a site below `root_dir`.
pub fn default_target_dir(root_dir: &Path, site_name: &str) -> PathBuf {
    root_dir.join(site_dir_name(site_name))
}

/// Validate a site name.
pub fn validate_site_name(site_name: &str) -> Result<(), AppError> {
    let trimmed = site_name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("A name is required.".to_string()));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(AppError::Validation(format!("'{}' is not a valid name.", trimmed)));
    }
    Ok(())
}

/// Validate an auth package identifier (`extjs-app-imapuser`).
pub fn validate_package_name(name: &str) -> Result<(), AppError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && !name.starts_with('-');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid package name '{}': must be alphanumeric with hyphens or underscores",
            name
        )))
    }
}

/// Everything the orchestrator needs for one run.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub site_name: String,
    pub target_dir: PathBuf,
    pub version: String,
    pub install_type: InstallType,
    pub bundle: BundleType,
    /// Present for custom installations.
    pub urls: Option<BackendUrls>,
    pub auth_package: String,
    /// Replace an existing installation at `target_dir`.
    pub overwrite: bool,
}
