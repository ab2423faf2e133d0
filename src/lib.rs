//! create-conjoon: create conjoon installations and carry their configuration
//! across upgrades.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{available_versions, install, latest_version, load_config};
pub use app::commands::install::{FileMerge, InstallOutcome};
pub use domain::{
    AppError, BackendUrls, BundleType, CollisionPolicy, ConfigPath, InstallRequest, InstallType,
    InstallerConfig, JsonDocument, MergeMiss, MergeOutcome, merge_documents,
};
