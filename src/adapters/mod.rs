mod github_release;
mod npm_command;

pub use github_release::{HttpReleaseSource, extract_archive};
pub use npm_command::NpmCommandAdapter;
