use crate::domain::InstallerConfig;
use crate::ports::{PackageRegistry, ReleaseSource};

/// Application context holding dependencies for command execution.
pub struct AppContext<R: PackageRegistry, S: ReleaseSource> {
    registry: R,
    releases: S,
    config: InstallerConfig,
}

impl<R: PackageRegistry, S: ReleaseSource> AppContext<R, S> {
    /// Create a new application context.
    pub fn new(registry: R, releases: S, config: InstallerConfig) -> Self {
        Self { registry, releases, config }
    }

    /// Get a reference to the package registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Get a reference to the release archive source.
    pub fn releases(&self) -> &S {
        &self.releases
    }

    /// Get a reference to the installer configuration.
    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }
}
