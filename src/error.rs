//! Error types for configuration resolution and the build hook.
//!
//! Every fatal condition names the path it concerns so the driver can print
//! a diagnostic without extra context. `ManifestMissing` is the only kind a
//! caller may downgrade, and only for local builds.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    /// The override file named by the environment does not exist.
    #[error("Cannot access override file: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Failed to parse override file `{}`: {message}", path.display())]
    OverridesMalformed { path: PathBuf, message: String },

    /// A recognized option holds a value of the wrong shape.
    #[error("Invalid value `{value}` for option `{option}`")]
    InvalidOption { option: String, value: String },

    /// A file referenced from the override file could not be found, either
    /// as given or relative to the override file's directory.
    #[error("Cannot find file: {}", path.display())]
    ReferencedFileNotFound { path: PathBuf },

    #[error("Cannot read hidden books list `{}`: {source}", path.display())]
    HiddenBooksUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid exclude pattern `{pattern}`: {source}")]
    InvalidExcludePattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("Asset manifest not available: {}", path.display())]
    ManifestMissing { path: PathBuf },

    #[error("Failed to parse asset manifest `{}`: {source}", path.display())]
    ManifestMalformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to render cover page from `{}`: {message}", path.display())]
    ImageRenderFailure { path: PathBuf, message: String },

    #[error("Failed to parse project configuration `{}`: {source}", path.display())]
    ProjectConfigMalformed {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("IO error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SetupError {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> SetupError {
        SetupError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SetupError>;
