//! Interactive prompts.
//!
//! Every prompt returns `Ok(None)` when the user cancels it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Error as DialoguerError, Input, Select};

use crate::domain::installation::{
    DEFAULT_SITE_NAME, normalize_service_url, validate_package_name, validate_site_name,
};
use crate::domain::release::recent_versions;
use crate::domain::{AppError, BundleType, InstallType};

const MANUAL_VERSION_OPTION: &str = "<enter manually>";
const RECENT_VERSION_COUNT: usize = 5;

fn read_text<F>(
    prompt: &str,
    default: Option<&str>,
    validate: F,
) -> Result<Option<String>, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    let result = input
        .validate_with(|value: &String| validate(value).map_err(|err| err.to_string()))
        .interact_text();

    match result {
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::Validation(format!("Failed to read {}: {}", prompt, err))),
    }
}

pub fn site_name() -> Result<Option<String>, AppError> {
    read_text("Name of your site", Some(DEFAULT_SITE_NAME), validate_site_name)
}

pub fn target_dir(default: &Path) -> Result<Option<PathBuf>, AppError> {
    let value = read_text("Target directory", Some(&default.display().to_string()), |input| {
        if input.trim().is_empty() {
            Err(AppError::Validation("A target directory is required.".to_string()))
        } else {
            Ok(())
        }
    })?;
    Ok(value.map(PathBuf::from))
}

pub fn confirm_overwrite(target: &Path) -> Result<Option<bool>, AppError> {
    Confirm::new()
        .with_prompt(format!(
            "The path {} already exists. Update the installation? Your configuration will be \
             backed up and merged into the new version.",
            target.display()
        ))
        .default(false)
        .interact_opt()
        .map_err(|err| AppError::Validation(format!("Failed to confirm overwrite: {}", err)))
}

pub fn install_type() -> Result<Option<InstallType>, AppError> {
    let items: Vec<&str> = InstallType::ALL.iter().map(|kind| kind.description()).collect();
    let selection = Select::new()
        .with_prompt("Installation type")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|err| AppError::Validation(format!("Failed to select type: {}", err)))?;

    Ok(selection.map(|index| InstallType::ALL[index]))
}

pub fn bundle() -> Result<Option<BundleType>, AppError> {
    let items: Vec<&str> = BundleType::ALL.iter().map(|kind| kind.description()).collect();
    let selection = Select::new()
        .with_prompt("Installation source")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|err| AppError::Validation(format!("Failed to select source: {}", err)))?;

    Ok(selection.map(|index| BundleType::ALL[index]))
}

/// Pick one of the most recent versions, or type one in.
///
/// `versions` is sorted oldest first.
pub fn version(versions: &[String]) -> Result<Option<String>, AppError> {
    let recent = recent_versions(versions, RECENT_VERSION_COUNT);
    if recent.is_empty() {
        return read_text("Version", None, |input| {
            if input.trim().is_empty() {
                Err(AppError::Validation("A version is required.".to_string()))
            } else {
                Ok(())
            }
        });
    }

    let mut items: Vec<&str> = recent.iter().map(String::as_str).collect();
    items.push(MANUAL_VERSION_OPTION);
    let selection = Select::new()
        .with_prompt("Version")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|err| AppError::Validation(format!("Failed to select version: {}", err)))?;

    match selection {
        Some(index) if index < recent.len() => Ok(Some(recent[index].clone())),
        Some(_) => read_text("Version", Some(&recent[0]), |input| {
            if versions.iter().any(|v| v == input.trim()) {
                Ok(())
            } else {
                Err(AppError::Validation(format!("Version {} is not published.", input.trim())))
            }
        }),
        None => Ok(None),
    }
}

pub fn service_url(label: &str, default: &str) -> Result<Option<String>, AppError> {
    let prompt = format!("URL of the {} service", label);
    let value = read_text(&prompt, Some(default), |input| {
        normalize_service_url(input).map(|_| ())
    })?;
    value.map(|raw| normalize_service_url(&raw)).transpose()
}

pub fn auth_package(default: &str) -> Result<Option<String>, AppError> {
    read_text("Package providing authentication", Some(default), validate_package_name)
}
