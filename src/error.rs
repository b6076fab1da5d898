//! Error types for release assembly.
//!
//! Every fatal condition in the pipeline maps to one variant here. Missing
//! optional folders are not errors: they are logged and reported through
//! [`CopySummary`](crate::release::CopySummary).

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Developer environment or toolchain file absent, detected before any process is spawned
    #[error("{what} not found at: {}", display_paths(.paths))]
    MissingPrerequisite {
        /// Human readable name of the prerequisite
        what: String,
        /// Every absolute path that was expected
        paths: Vec<PathBuf>,
    },

    /// A required file to stage does not exist
    #[error("Missing source file: {}", .path.display())]
    MissingSource {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// An external process could not be started or exited unsuccessfully
    #[error("Command execution failed: {command} - {reason}")]
    ExternalProcess {
        /// Command line as it was run
        command: String,
        /// Reason for the error
        reason: String,
    },

    /// None of the archiver candidates exist
    #[error("Archiver executable not found. Searched: {}", display_paths(.searched))]
    ArchiverNotFound {
        /// Candidate locations that were probed
        searched: Vec<PathBuf>,
    },

    /// Invalid settings or command line combination
    #[error("Invalid configuration: {reason}")]
    Config {
        /// Reason for the error
        reason: String,
    },

    /// Filesystem failure with the operation and path it happened on
    #[error("{context} ({}): {source}", .path.display())]
    Io {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Attaches an operation description and path to I/O errors.
pub trait ErrorExt<T> {
    /// Converts the error into [`ReleaseError::Io`] naming `context` and `path`.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::io::Result<T> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| ReleaseError::Io {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

impl ReleaseError {
    /// Short name of the error kind, used in the final failure report
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingPrerequisite { .. } => "MissingPrerequisiteError",
            Self::MissingSource { .. } => "MissingSourceError",
            Self::ExternalProcess { .. } => "ExternalProcessError",
            Self::ArchiverNotFound { .. } => "ArchiverNotFoundError",
            Self::Config { .. } => "ConfigError",
            Self::Io { .. } => "IoError",
            Self::Toml(_) => "ConfigError",
        }
    }
}
