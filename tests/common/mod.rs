//! Shared testing utilities for create-conjoon CLI tests.

use assert_cmd::Command;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Testing harness providing an isolated working directory for CLI runs.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, work_dir }
    }

    /// Path to the directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a command for invoking the compiled binary within the work directory.
    pub fn cli(&self) -> Command {
        let mut cmd =
            Command::cargo_bin("create-conjoon").expect("Failed to locate create-conjoon binary");
        cmd.current_dir(self.work_dir()).env_remove("CREATE_CONJOON_CONFIG").env_remove("RUST_LOG");
        cmd
    }

    /// Point release downloads at `base_url` and keep npm out of reach.
    pub fn write_installer_config(&self, base_url: &str) {
        let content = format!(
            "[registry]\nprogram = \"create-conjoon-test-missing-npm\"\n\n\
             [release]\nbase_url = \"{}\"\ntimeout_secs = 10\n",
            base_url
        );
        fs::write(self.work_dir.join(".create-conjoon.toml"), content)
            .expect("Failed to write installer config");
    }

    /// Path of the installation named `name` in the work directory.
    pub fn site(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }

    pub fn read_json(&self, path: &Path) -> serde_json::Value {
        let content = fs::read_to_string(path).expect("Failed to read JSON file");
        serde_json::from_str(&content).expect("Failed to parse JSON file")
    }

    pub fn write_json(&self, path: &Path, value: &serde_json::Value) {
        let content = serde_json::to_string_pretty(value).expect("Failed to serialize JSON");
        fs::write(path, content).expect("Failed to write JSON file");
    }
}

/// Download path of the release archive for `version`.
#[allow(dead_code)]
pub fn archive_path(version: &str) -> String {
    format!("/releases/download/v{0}/conjoon.build.refs.tags.v{0}.zip", version)
}

/// Zip archive with every entry below a single `conjoon/` root.
#[allow(dead_code)]
pub fn release_archive(files: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in files {
        zip.start_file(format!("conjoon/{}", name), options).expect("Failed to add zip entry");
        zip.write_all(content.as_bytes()).expect("Failed to write zip entry");
    }
    zip.finish().expect("Failed to finish zip").into_inner()
}
