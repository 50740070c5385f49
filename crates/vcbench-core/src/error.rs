//! Issuance error types.

use thiserror::Error;

/// Errors that can occur while issuing credentials against an agent.
#[derive(Debug, Error)]
pub enum IssuanceError {
    /// The request never produced a response (connection refused, timeout, etc.).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("service error: HTTP {status}: {body}")]
    Service { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// A drain cycle used up its poll-round budget with handles still unacknowledged.
    #[error("issuance timeout: {in_flight} exchange(s) unacknowledged after {rounds} poll round(s)")]
    Timeout { in_flight: usize, rounds: u32 },

    /// Schema, credential definition or connection lookup failed.
    #[error("discovery error: {0}")]
    Discovery(String),

    /// Invalid run configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl IssuanceError {
    /// Returns `true` if this error must terminate the run.
    ///
    /// Only [`IssuanceError::Timeout`] is recovered by the batch issuer.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if this error is transient and may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<serde_json::Error> for IssuanceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
