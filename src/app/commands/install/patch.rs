//! Installer choices written into a fresh installation.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::conjoon_config::{
    ApplicationSection, PackageManifestPatch, SIMULATOR_PACKAGES, auth_service_base,
    email_service_base, package_path, register_controller,
};
use crate::domain::layout::{self, PACKAGE_MANIFEST};
use crate::domain::{
    AppError, BackendUrls, CollisionPolicy, ConfigKind, ConfigPath, InstallRequest, InstallType,
    JsonDocument,
};

/// Service bases the development configuration ships with. The version
/// segment after `api/v` varies between releases.
const DEV_SERVICE_PREFIXES: [&str; 2] = [
    "https://ddev-ms-email.ddev.site/rest-imapuser/api/v",
    "https://ddev-ms-email.ddev.site/rest-api-email/api/v",
];

/// Write the installer choices into every configuration file below `root`
/// and into `package.json`. Returns the files that were rewritten.
pub fn apply(
    root: &Path,
    request: &InstallRequest,
    policy: CollisionPolicy,
) -> Result<Vec<PathBuf>, AppError> {
    let mut patched = Vec::new();
    let urls = match request.install_type {
        InstallType::Custom => request.urls.as_ref(),
        InstallType::Quick => None,
    };

    for path in layout::patch_targets(root) {
        let kind = if path.ends_with(ConfigKind::Development.file_name()) {
            ConfigKind::Development
        } else {
            ConfigKind::Production
        };
        let document = JsonDocument::read(&path)?;
        let document = patch_config(document, kind, request, urls, policy)?;
        document.write(&path)?;
        tracing::debug!(path = %path.display(), kind = kind.label(), "applied installer choices");
        patched.push(path);
    }

    let manifest = root.join(PACKAGE_MANIFEST);
    if manifest.is_file() {
        patch_manifest(&manifest, &request.site_name)?;
        patched.push(manifest);
    }

    Ok(patched)
}

fn patch_config(
    document: JsonDocument,
    kind: ConfigKind,
    request: &InstallRequest,
    urls: Option<&BackendUrls>,
    policy: CollisionPolicy,
) -> Result<JsonDocument, AppError> {
    let mut entries = application_entries(&request.site_name)?;

    let document = match urls {
        Some(urls) => {
            let document = match kind {
                ConfigKind::Development => rebase_dev_urls(document, urls)?,
                ConfigKind::Production => {
                    let switches = SIMULATOR_PACKAGES
                        .iter()
                        .filter(|package| document.contains(&package_path(package)))
                        .map(|package| (register_controller(package), Value::Bool(false)));
                    entries.extend(switches);
                    document
                }
            };
            entries.push((auth_service_base(&request.auth_package), Value::from(&*urls.auth)));
            entries.push((email_service_base(), Value::from(&*urls.email)));
            document
        }
        None => document,
    };

    document.with_values(entries, policy)
}

/// `conjoon.application.*` entries, one per section field so that other
/// keys of the section survive.
fn application_entries(site_name: &str) -> Result<Vec<(ConfigPath, Value)>, AppError> {
    let section = serde_json::to_value(ApplicationSection::for_site(site_name))
        .map_err(|e| AppError::Validation(format!("Invalid application section: {}", e)))?;
    let Value::Object(fields) = section else {
        return Ok(Vec::new());
    };
    let base = ApplicationSection::path();
    Ok(fields.into_iter().map(|(key, value)| (base.child(key), value)).collect())
}

/// Point every string value still using a default development service base
/// at the configured backend.
fn rebase_dev_urls(document: JsonDocument, urls: &BackendUrls) -> Result<JsonDocument, AppError> {
    let replacements =
        [(DEV_SERVICE_PREFIXES[0], &urls.auth), (DEV_SERVICE_PREFIXES[1], &urls.email)];
    let mut value = document.into_value();
    rebase_strings(&mut value, &replacements);
    JsonDocument::from_value(value)
}

fn rebase_strings(value: &mut Value, replacements: &[(&str, &String)]) {
    match value {
        Value::String(text) => {
            for (prefix, replacement) in replacements {
                if let Some(rebased) = rebase_service_url(text, prefix, replacement) {
                    *text = rebased;
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| rebase_strings(item, replacements)),
        Value::Object(map) => map.values_mut().for_each(|item| rebase_strings(item, replacements)),
        _ => {}
    }
}

/// Replace `<prefix><version>/` occurrences in `text` with `replacement`.
fn rebase_service_url(text: &str, prefix: &str, replacement: &str) -> Option<String> {
    let mut rest = text;
    let mut out = String::with_capacity(text.len());
    let mut changed = false;

    while let Some(start) = rest.find(prefix) {
        let after = &rest[start + prefix.len()..];
        let Some(slash) = after.find('/') else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(replacement);
        rest = &after[slash + 1..];
        changed = true;
    }

    changed.then(|| {
        out.push_str(rest);
        out
    })
}

/// Overwrite the top-level manifest fields the installer owns.
fn patch_manifest(path: &Path, site_name: &str) -> Result<(), AppError> {
    let patch = serde_json::to_value(PackageManifestPatch::for_site(site_name))
        .map_err(|e| AppError::json(path, e))?;
    let Value::Object(fields) = patch else {
        return Ok(());
    };

    let document = JsonDocument::read(path)?;
    let entries = fields.into_iter().map(|(key, value)| (ConfigPath::new([key]), value));
    document.with_values(entries, CollisionPolicy::Restructure)?.write(path)
}
