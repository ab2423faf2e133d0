//! On-disk layout of a conjoon installation.

use std::path::{Path, PathBuf};

/// Resource directories that may hold the live configuration, in lookup order.
pub const RESOURCE_DIRS: [&str; 2] = ["desktop/resources", "resources/coon-js"];

/// Resource directory of the production build shipped with the npm package.
pub const BUILD_RESOURCE_DIR: &str = "build/production/conjoon/desktop/resources/coon-js";

/// Package manifest at the installation root.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Version pin written at the installation root after every run.
pub const VERSION_FILE: &str = ".conjoon-version";

/// The two configuration files an installation carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Production,
    Development,
}

impl ConfigKind {
    pub const ALL: [ConfigKind; 2] = [ConfigKind::Production, ConfigKind::Development];

    pub fn file_name(self) -> &'static str {
        match self {
            ConfigKind::Production => "conjoon.conf.json",
            ConfigKind::Development => "conjoon.dev.conf.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfigKind::Production => "production",
            ConfigKind::Development => "development",
        }
    }
}

/// Candidate locations of `kind` below `root`, in lookup order.
pub fn candidates(root: &Path, kind: ConfigKind) -> Vec<PathBuf> {
    RESOURCE_DIRS.iter().map(|dir| root.join(dir).join(kind.file_name())).collect()
}

/// First existing configuration file of `kind` below `root`.
pub fn locate(root: &Path, kind: ConfigKind) -> Option<PathBuf> {
    candidates(root, kind).into_iter().find(|path| path.is_file())
}

/// Every existing configuration file below `root` that receives installer
/// choices, including the production build copy.
pub fn patch_targets(root: &Path) -> Vec<PathBuf> {
    let dirs = RESOURCE_DIRS.iter().copied().chain([BUILD_RESOURCE_DIR]);
    dirs.flat_map(|dir| ConfigKind::ALL.map(|kind| root.join(dir).join(kind.file_name())))
        .filter(|path| path.is_file())
        .collect()
}

/// Configuration files found in an existing installation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFiles {
    pub production: Option<PathBuf>,
    pub development: Option<PathBuf>,
}

impl ConfigFiles {
    pub fn probe(root: &Path) -> Self {
        Self {
            production: locate(root, ConfigKind::Production),
            development: locate(root, ConfigKind::Development),
        }
    }

    /// Whether `root` looks like a prior installation.
    pub fn is_installation(&self) -> bool {
        self.production.is_some() || self.development.is_some()
    }

    pub fn get(&self, kind: ConfigKind) -> Option<&Path> {
        match kind {
            ConfigKind::Production => self.production.as_deref(),
            ConfigKind::Development => self.development.as_deref(),
        }
    }

    /// Existing files paired with their kind.
    pub fn iter(&self) -> impl Iterator<Item = (ConfigKind, &Path)> {
        ConfigKind::ALL.into_iter().filter_map(|kind| self.get(kind).map(|path| (kind, path)))
    }
}
