//! Reporting error types

use thiserror::Error;

/// Errors raised while talking to the token or ingestion endpoints
#[derive(Debug, Error)]
pub enum ReportError {
    /// The token endpoint did not produce a token for the device
    #[error("No token available for device {0}")]
    TokenUnavailable(String),

    /// The endpoint answered with a non-success status
    #[error("Endpoint rejected the request with status {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Connection, timeout, or protocol failure
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint URL could not be built
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// The response body exceeded the size cap
    #[error("Response body of {0} bytes exceeds the limit")]
    ResponseTooLarge(u64),

    /// The response body could not be decoded
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ReportError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ReportError::Rejected { status, .. } => Some(*status),
            ReportError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for reporting operations
pub type ReportResult<T> = Result<T, ReportError>;
