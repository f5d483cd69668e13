//! Error types for the build driver

use std::path::PathBuf;
use thiserror::Error;

/// Result type for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build driver errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Command exited non-zero or could not be spawned
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Artifact not found where a previous step should have left it
    #[error("Expected artifact not found at {expected_path}")]
    ArtifactNotFound { expected_path: PathBuf },

    /// Property list could not be written
    #[error("Property list error: {0}")]
    Plist(#[from] plist::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

