use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::PackageRegistry;

/// In-memory registry that "installs" a fixed file set.
#[derive(Default)]
pub struct FakeRegistry {
    versions: Vec<String>,
    manifest: Option<String>,
    files: Vec<(String, String)>,
    install_nothing: bool,
    fail_dev_tools: bool,
    installs: Mutex<Vec<(String, String, PathBuf)>>,
    dev_tool_installs: Mutex<Vec<PathBuf>>,
    manifest_aside: Mutex<bool>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, versions: &[&str]) -> Self {
        self.versions = versions.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn with_package_manifest(mut self, content: &str) -> Self {
        self.manifest = Some(content.to_string());
        self
    }

    /// File written below the installed package directory.
    pub fn with_file(mut self, relative: &str, content: &str) -> Self {
        self.files.push((relative.to_string(), content.to_string()));
        self
    }

    pub fn failing_dev_tools(mut self) -> Self {
        self.fail_dev_tools = true;
        self
    }

    /// Report success without creating the package directory.
    pub fn installing_nothing(mut self) -> Self {
        self.install_nothing = true;
        self
    }

    pub fn installs(&self) -> Vec<(String, String, PathBuf)> {
        self.installs.lock().unwrap().clone()
    }

    pub fn dev_tool_installs(&self) -> Vec<PathBuf> {
        self.dev_tool_installs.lock().unwrap().clone()
    }

    pub fn manifest_was_aside_during_dev_tools(&self) -> bool {
        *self.manifest_aside.lock().unwrap()
    }
}

impl PackageRegistry for FakeRegistry {
    fn list_versions(&self, _package: &str) -> Result<Vec<String>, AppError> {
        Ok(self.versions.clone())
    }

    fn version_exists(&self, _package: &str, version: &str) -> Result<bool, AppError> {
        Ok(self.versions.iter().any(|v| v == version))
    }

    fn install(&self, package: &str, version: &str, prefix: &Path) -> Result<(), AppError> {
        self.installs.lock().unwrap().push((
            package.to_string(),
            version.to_string(),
            prefix.to_path_buf(),
        ));
        if self.install_nothing {
            return Ok(());
        }

        let root =
            package.split('/').fold(prefix.join("node_modules"), |dir, segment| dir.join(segment));
        fs::create_dir_all(&root)?;
        if let Some(manifest) = &self.manifest {
            fs::write(root.join("package.json"), manifest)?;
        }
        for (relative, content) in &self.files {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        Ok(())
    }

    fn install_dev_tools(&self, prefix: &Path) -> Result<(), AppError> {
        self.dev_tool_installs.lock().unwrap().push(prefix.to_path_buf());
        *self.manifest_aside.lock().unwrap() =
            self.manifest.is_some() && !prefix.join("package.json").exists();
        if self.fail_dev_tools {
            return Err(AppError::ExternalToolError {
                tool: "npm i webpack-dev-server".to_string(),
                error: "exited with code 1".to_string(),
            });
        }
        Ok(())
    }
}
