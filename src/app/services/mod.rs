pub mod backup;
pub mod config_merge;
