pub mod installer_config;
pub mod loader;

pub use installer_config::{InstallerConfig, MergeConfig, RegistryConfig, ReleaseConfig};
pub use loader::{CONFIG_ENV, CONFIG_FILE, load_config, parse_config_content};
