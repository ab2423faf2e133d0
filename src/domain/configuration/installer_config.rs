//! Installer configuration domain models.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;
use crate::domain::backup::TagStrategy;
use crate::domain::document::CollisionPolicy;

/// Installer configuration loaded from `.create-conjoon.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallerConfig {
    /// Package registry configuration.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Release archive configuration.
    #[serde(default)]
    pub release: ReleaseConfig,
    /// Configuration reconciliation behavior.
    #[serde(default)]
    pub merge: MergeConfig,
}

impl InstallerConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.registry.validate()?;
        self.release.validate()?;
        Ok(())
    }
}

/// Package registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Package providing the application.
    #[serde(default = "default_package")]
    pub package: String,
    /// Package manager executable.
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { package: default_package(), program: default_program() }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.package.trim().is_empty() {
            return Err(AppError::InvalidConfig("registry.package must not be empty".to_string()));
        }
        if self.program.trim().is_empty() {
            return Err(AppError::InvalidConfig("registry.program must not be empty".to_string()));
        }
        Ok(())
    }
}

fn default_package() -> String {
    "@conjoon/conjoon".to_string()
}

fn default_program() -> String {
    "npm".to_string()
}

/// Release archive configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Repository URL the release downloads live under.
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Project name used in archive file names.
    #[serde(default = "default_project")]
    pub project: String,
    /// Download timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            project: default_project(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ReleaseConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "release.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.project.trim().is_empty() {
            return Err(AppError::InvalidConfig("release.project must not be empty".to_string()));
        }
        Ok(())
    }
}

fn default_base_url() -> Url {
    Url::parse("https://github.com/conjoon/conjoon").expect("Default release URL must be valid")
}

fn default_project() -> String {
    "conjoon".to_string()
}

fn default_timeout() -> u64 {
    300
}

/// Configuration reconciliation behavior.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    /// What installer writes do when a path runs through a scalar.
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
    /// How backup files are tagged.
    #[serde(default)]
    pub backup_tag: TagStrategy,
}
