//! Installer configuration loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::AppError;
use crate::domain::configuration::InstallerConfig;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "CREATE_CONJOON_CONFIG";

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".create-conjoon.toml";

/// Resolve which configuration file applies, if any.
///
/// An explicit path wins over the environment variable, which wins over the
/// working-directory file. Explicit paths must exist.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    cwd: &Path,
) -> Result<Option<PathBuf>, AppError> {
    let requested =
        explicit.map(Path::to_path_buf).or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    if let Some(path) = requested {
        if !path.is_file() {
            return Err(AppError::InvalidConfig(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path));
    }

    let local = cwd.join(CONFIG_FILE);
    Ok(local.is_file().then_some(local))
}

/// Load the installer configuration, falling back to defaults.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<InstallerConfig, AppError> {
    match resolve_config_path(explicit, cwd)? {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading installer configuration");
            let content = fs::read_to_string(&path)?;
            parse_config_content(&content)
        }
        None => Ok(InstallerConfig::default()),
    }
}

/// Parse configuration from string content.
pub fn parse_config_content(content: &str) -> Result<InstallerConfig, AppError> {
    let config: InstallerConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
