//! API Facade for the application.
//!
//! Glues context creation from the installer configuration to command
//! execution with the real npm and HTTP adapters.

use std::path::Path;

use crate::adapters::{HttpReleaseSource, NpmCommandAdapter};
use crate::app::AppContext;
use crate::app::commands::install;
use crate::domain::configuration;
use crate::domain::release::sort_versions;
use crate::ports::PackageRegistry;

pub use crate::app::commands::install::{FileMerge, InstallOutcome};
pub use crate::domain::{AppError, InstallRequest, InstallerConfig};

/// Create an `AppContext` backed by npm and HTTP release downloads.
fn create_context(
    config: InstallerConfig,
) -> Result<AppContext<NpmCommandAdapter, HttpReleaseSource>, AppError> {
    let registry = NpmCommandAdapter::new(config.registry.program.clone());
    let releases = HttpReleaseSource::new(&config.release)?;
    Ok(AppContext::new(registry, releases, config))
}

/// Load the installer configuration for the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<InstallerConfig, AppError> {
    configuration::load_config(explicit, &std::env::current_dir()?)
}

/// Published versions of the configured package, oldest first.
pub fn available_versions(config: &InstallerConfig) -> Result<Vec<String>, AppError> {
    let registry = NpmCommandAdapter::new(config.registry.program.clone());
    Ok(sort_versions(registry.list_versions(&config.registry.package)?))
}

/// Newest published version of the configured package.
pub fn latest_version(config: &InstallerConfig) -> Result<String, AppError> {
    let ctx = create_context(config.clone())?;
    install::resolve_version(&ctx, None)
}

/// Create or update an installation.
pub fn install(
    request: &InstallRequest,
    config: InstallerConfig,
) -> Result<InstallOutcome, AppError> {
    let ctx = create_context(config)?;
    install::execute(&ctx, request)
}
