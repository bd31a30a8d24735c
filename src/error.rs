//! Error taxonomy for the conformance harness
//!
//! Every failure a check can hit is one of these. None of them escape a
//! check: the runner turns them into failing `TestResult`s.

use thiserror::Error;

/// Connection, timeout or client-construction failure below the HTTP layer.
///
/// Carries the rendered message rather than the `reqwest::Error` so that
/// test transports can produce one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// The handshake did not yield an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("CSRF token unavailable (status {0})")]
    TokenUnavailable(u16),

    #[error("invalid credentials: no user in session after sign-in")]
    InvalidCredentials,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Why a single conformance check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Status: expected {expected}, got {actual}. Response: {body}")]
    UnexpectedStatus {
        expected: String,
        actual: u16,
        body: String,
    },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    MissingPrerequisite(&'static str),
}

impl CheckError {
    pub fn shape(message: impl Into<String>) -> Self {
        CheckError::ShapeMismatch(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} cannot be empty")]
    Empty { name: &'static str },

    #[error("base URL must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
}
