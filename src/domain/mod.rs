pub mod backup;
pub mod configuration;
pub mod conjoon_config;
pub mod document;
pub mod error;
pub mod installation;
pub mod layout;
pub mod merge;
pub mod release;
pub mod version;

pub use backup::{BACKUP_DIR, BackupTag, TagStrategy};
pub use configuration::InstallerConfig;
pub use document::{CollisionPolicy, ConfigPath, JsonDocument, Leaf};
pub use error::AppError;
pub use installation::{BackendUrls, BundleType, InstallRequest, InstallType};
pub use layout::{ConfigFiles, ConfigKind};
pub use merge::{MergeMiss, MergeOutcome, merge_documents};
pub use version::Version;
