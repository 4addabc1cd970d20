//! Error types for event dispatch.

use thiserror::Error;

/// Why a single delivery attempt failed.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection could not be established (refused, reset, DNS)
    #[error("Connection error: {0}")]
    Connect(String),

    /// Any other transport-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Endpoint answered with a status outside the success policy
    #[error("Unexpected status code: {0}")]
    Status(u16),

    /// Event could not be serialized
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl DispatchError {
    /// Transport-level failures as opposed to status or serialization failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DispatchError::Timeout(_) | DispatchError::Connect(_) | DispatchError::Transport(_)
        )
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout(err.to_string())
        } else if err.is_connect() {
            DispatchError::Connect(err.to_string())
        } else if err.is_builder() {
            DispatchError::Client(err.to_string())
        } else {
            DispatchError::Transport(err.to_string())
        }
    }
}
