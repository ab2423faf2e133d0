use std::path::Path;

use crate::domain::AppError;

/// Package registry the application is published to.
pub trait PackageRegistry {
    /// All published versions of `package`, in registry order.
    fn list_versions(&self, package: &str) -> Result<Vec<String>, AppError>;

    /// Whether `package@version` is published.
    fn version_exists(&self, package: &str, version: &str) -> Result<bool, AppError>;

    /// Install `package@version` below `prefix` (into `prefix/node_modules`).
    fn install(&self, package: &str, version: &str, prefix: &Path) -> Result<(), AppError>;

    /// Install the development server tooling into `prefix`.
    fn install_dev_tools(&self, prefix: &Path) -> Result<(), AppError>;
}
