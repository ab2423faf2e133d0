use std::fs;
use std::path::Path;
use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::ReleaseSource;

/// Release source that extracts a fixed file set.
#[derive(Default)]
pub struct FakeReleaseSource {
    files: Vec<(String, String)>,
    missing: bool,
    fetched: Mutex<Vec<String>>,
}

impl FakeReleaseSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, relative: &str, content: &str) -> Self {
        self.files.push((relative.to_string(), content.to_string()));
        self
    }

    /// Every fetch fails like a 404 download.
    pub fn missing_release(mut self) -> Self {
        self.missing = true;
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl ReleaseSource for FakeReleaseSource {
    fn fetch(&self, version: &str, dest: &Path) -> Result<(), AppError> {
        self.fetched.lock().unwrap().push(version.to_string());
        if self.missing {
            return Err(AppError::Download {
                url: format!("fake://releases/{}.zip", version),
                details: "HTTP 404 Not Found".to_string(),
            });
        }

        fs::create_dir_all(dest)?;
        for (relative, content) in &self.files {
            let path = dest.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        Ok(())
    }
}
