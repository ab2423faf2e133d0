//! Materialize installation content in a staging directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::AppContext;
use crate::domain::layout::PACKAGE_MANIFEST;
use crate::domain::{AppError, BundleType, InstallRequest, JsonDocument};
use crate::ports::{PackageRegistry, ReleaseSource};

/// Content ready to be moved into the target directory.
#[derive(Debug)]
pub struct Acquired {
    pub root: PathBuf,
    pub version: String,
    pub warnings: Vec<String>,
}

/// Fetch the requested content into `staging`.
pub fn acquire<R, S>(
    ctx: &AppContext<R, S>,
    request: &InstallRequest,
    staging: &Path,
) -> Result<Acquired, AppError>
where
    R: PackageRegistry,
    S: ReleaseSource,
{
    match request.bundle {
        BundleType::Npm => {
            from_registry(ctx.registry(), &ctx.config().registry.package, request, staging)
        }
        BundleType::Release => from_release(ctx.releases(), request, staging),
    }
}

fn from_registry<R: PackageRegistry>(
    registry: &R,
    package: &str,
    request: &InstallRequest,
    staging: &Path,
) -> Result<Acquired, AppError> {
    if !registry.version_exists(package, &request.version)? {
        return Err(AppError::VersionNotFound {
            package: package.to_string(),
            version: request.version.clone(),
        });
    }

    println!("Installing {}@{}...", package, request.version);
    registry.install(package, &request.version, staging)?;

    let root = installed_package_dir(staging, package);
    if !root.is_dir() {
        return Err(AppError::PackageMissing(root.display().to_string()));
    }
    let version = manifest_version(&root).unwrap_or_else(|| request.version.clone());

    let mut warnings = Vec::new();
    println!("Installing webpack...");
    if let Err(err) = with_manifest_aside(&root, || registry.install_dev_tools(&root))? {
        tracing::warn!(error = %err, "development tooling not installed");
        warnings.push(format!(
            "Installing webpack failed, but the base installation is available ({})",
            err
        ));
    }

    Ok(Acquired { root, version, warnings })
}

fn from_release<S: ReleaseSource>(
    releases: &S,
    request: &InstallRequest,
    staging: &Path,
) -> Result<Acquired, AppError> {
    let root = staging.join("release");
    println!("Downloading release {}...", request.version);
    releases.fetch(&request.version, &root)?;

    let version = request.version.trim().trim_start_matches('v').to_string();
    Ok(Acquired { root, version, warnings: Vec::new() })
}

/// `<prefix>/node_modules/<scope>/<name>` for a possibly scoped package.
fn installed_package_dir(prefix: &Path, package: &str) -> PathBuf {
    package.split('/').fold(prefix.join("node_modules"), |dir, segment| dir.join(segment))
}

fn manifest_version(root: &Path) -> Option<String> {
    let manifest = JsonDocument::read(&root.join(PACKAGE_MANIFEST)).ok()?;
    manifest.as_map().get("version")?.as_str().map(str::to_string)
}

/// Run `f` with `package.json` moved out of the way so that npm does not
/// rewrite the installation's manifest. The manifest is always put back.
fn with_manifest_aside<T>(root: &Path, f: impl FnOnce() -> T) -> Result<T, AppError> {
    let manifest = root.join(PACKAGE_MANIFEST);
    let parked = root.join(format!(".{}.create-conjoon", PACKAGE_MANIFEST));

    let moved = manifest.is_file();
    if moved {
        fs::rename(&manifest, &parked)?;
    }
    let result = f();
    if moved {
        fs::rename(&parked, &manifest)?;
    }
    Ok(result)
}
