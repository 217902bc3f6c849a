//! Error types for PID manager calls
//!
//! Configuration problems are kept apart from per-request failures so a batch
//! can stop before touching any document when the client cannot be built.

/// Errors from a [`PidClient`](crate::PidClient)
#[derive(Debug, thiserror::Error)]
pub enum PidError {
    /// Client cannot be built from the given settings
    #[error("{0}")]
    Config(String),

    /// Service answered with an error status
    #[error("{status}: {message}")]
    Service { status: u16, message: String },

    /// Request never completed
    #[error("could not reach PID manager: {0}")]
    Transport(String),

    /// Service answered with a body that could not be understood
    #[error("unexpected response from PID manager: {0}")]
    InvalidResponse(String),
}

impl PidError {
    /// Create configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create service error from a status code and response text
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// True for errors raised before any request was made
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result alias for PID manager calls
pub type PidResult<T> = Result<T, PidError>;
