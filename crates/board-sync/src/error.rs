//! Error types for the task service boundary and form drafts.

use thiserror::Error;

/// Result type for task service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a remote task service call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never produced a response (network, CORS, aborted fetch).
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The service answered with a non-success HTTP status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The response body did not match the expected shape.
    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ServiceError {
    pub fn transport(endpoint: &str, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(endpoint: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::Transport { endpoint, .. } | Self::Status { endpoint, .. } | Self::Decode { endpoint, .. } => endpoint,
        }
    }
}

/// Rejected create/edit input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("member name must not be empty")]
    EmptyMemberName,
}
