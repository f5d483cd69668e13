//! Connect error types

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A non-success response from the API: the status code and the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: u16,
    pub message: String,
}

impl ApiFailure {
    /// Whether the platform rejected a create because the resource exists
    pub fn is_already_exists(&self) -> bool {
        self.message.contains("ENTITY_ALREADY_EXISTS")
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.status, self.message)
    }
}

/// App Store Connect errors
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Private key file missing
    #[error("API key file not found: {0}")]
    KeyFileNotFound(PathBuf),

    /// Invalid credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// API answered with an unexpected status
    #[error("API error: {0}")]
    Api(ApiFailure),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JWT error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Result type for connect operations
pub type Result<T> = std::result::Result<T, ConnectError>;

/// Splits API status failures off from everything else.
///
/// Workflows report an [`ApiFailure`] and carry on or return `false`;
/// transport, decoding and local file errors still propagate through `?`.
pub trait ApiOutcome<T> {
    fn api_outcome(self) -> Result<std::result::Result<T, ApiFailure>>;
}

impl<T> ApiOutcome<T> for Result<T> {
    fn api_outcome(self) -> Result<std::result::Result<T, ApiFailure>> {
        match self {
            Ok(value) => Ok(Ok(value)),
            Err(ConnectError::Api(failure)) => Ok(Err(failure)),
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_outcome_splits_api_failures() {
        let failed: Result<()> = Err(ConnectError::Api(ApiFailure {
            status: 409,
            message: "ENTITY_ALREADY_EXISTS".to_string(),
        }));
        let failure = failed.api_outcome().unwrap().unwrap_err();
        assert_eq!(failure.status, 409);
        assert!(failure.is_already_exists());

        let io: Result<()> = Err(ConnectError::Io(std::io::Error::other("disk")));
        assert!(io.api_outcome().is_err());

        let ok: Result<u8> = Ok(7);
        assert_eq!(ok.api_outcome().unwrap(), Ok(7));
    }

    #[test]
    fn test_api_failure_display() {
        let failure = ApiFailure {
            status: 403,
            message: "{\"errors\":[]}".to_string(),
        };
        assert_eq!(failure.to_string(), "403 - {\"errors\":[]}");
        assert!(!failure.is_already_exists());
    }
}
