//! Error types for the atomrun client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while launching a process
///
/// Every variant is fatal for the run: nothing above the transport retries.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP exchange kept returning unacceptable status codes
    #[error("{method} {endpoint} failed after {attempts} attempt(s) (last status {status})")]
    Transport {
        method: String,
        endpoint: String,
        /// Last HTTP status code seen
        status: u16,
        attempts: u32,
    },

    /// A lookup did not match exactly one entity
    #[error("{0}")]
    Resolution(String),

    /// The execution request was not accepted
    #[error("Failed to start execution: {0}")]
    Start(String),

    /// The status endpoint answered 200 without any status detail
    #[error("Execution {0} aborted: no status reported")]
    Aborted(String),

    /// HTTP request failed at the network level
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create a transport error for an exhausted exchange
    pub fn transport(
        method: impl Into<String>,
        endpoint: impl Into<String>,
        status: u16,
        attempts: u32,
    ) -> Self {
        Self::Transport {
            method: method.into(),
            endpoint: endpoint.into(),
            status,
            attempts,
        }
    }
}
