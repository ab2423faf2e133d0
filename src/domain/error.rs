use std::io;

use thiserror::Error;

/// Library-wide error type for create-conjoon operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Invalid installer configuration file content.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// JSON document could not be read or written.
    #[error("JSON error in {path}: {details}")]
    Json { path: String, details: String },

    /// JSON document root is not an object.
    #[error("{0} does not contain a JSON object")]
    NotADocument(String),

    /// A write path runs through a value that is not an object.
    #[error("Cannot set '{path}': '{at}' holds a non-object value")]
    PathCollision { path: String, at: String },

    /// Invalid user input.
    #[error("{0}")]
    Validation(String),

    /// The user cancelled an interactive prompt.
    #[error("{0}")]
    Cancelled(String),

    /// Target directory already exists and overwriting was not confirmed.
    #[error("The path {0} already exists. Use --overwrite to update an existing installation.")]
    TargetExists(String),

    /// Requested version is not published.
    #[error("Could not find version {version} of {package}")]
    VersionNotFound { package: String, version: String },

    /// External tool invocation failed.
    #[error("{tool} failed: {error}")]
    ExternalToolError { tool: String, error: String },

    /// Installed package content is missing where it was expected.
    #[error("Installed package not found at {0}")]
    PackageMissing(String),

    /// Archive download failed.
    #[error("Failed to download {url}: {details}")]
    Download { url: String, details: String },

    /// Archive extraction failed.
    #[error("Failed to extract archive: {0}")]
    Archive(String),

    /// Replacement failed after the backup directory was moved aside.
    #[error("{source}\nPrevious backups were kept at {holding}; copy them back manually.")]
    ReplaceAborted {
        holding: String,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub(crate) fn json(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        AppError::Json { path: path.display().to_string(), details: err.to_string() }
    }

    /// Provide an `io::ErrorKind`-like view for callers expecting legacy behavior.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::InvalidConfig(_)
            | AppError::TomlParseError(_)
            | AppError::Json { .. }
            | AppError::NotADocument(_)
            | AppError::PathCollision { .. }
            | AppError::Validation(_) => io::ErrorKind::InvalidInput,
            AppError::Cancelled(_) => io::ErrorKind::Interrupted,
            AppError::TargetExists(_) => io::ErrorKind::AlreadyExists,
            AppError::VersionNotFound { .. } | AppError::PackageMissing(_) => {
                io::ErrorKind::NotFound
            }
            AppError::Archive(_) => io::ErrorKind::InvalidData,
            AppError::ExternalToolError { .. } | AppError::Download { .. } => io::ErrorKind::Other,
            AppError::ReplaceAborted { source, .. } => source.kind(),
        }
    }
}
