//! Error types for the Xsolla client.
//!
//! # Design
//! `Display` on every variant is the human-readable message a caller shows
//! to its user. The four outcomes a request can fail with map onto
//! `Config`, `Client`, `ClientUnknown` and `Transport`; `kind()` collapses
//! the remaining variants into that taxonomy for hosts that only switch on
//! a category.

use std::time::Duration;

use thiserror::Error;

use crate::transport::TransportError;

/// Message reported for any failure where no response arrived.
pub const SERVER_IS_NOT_RESPONDING: &str = "Server is not responding. Please try later.";

/// Message reported for a non-2xx response without a readable error envelope.
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by builders, adapters and facades.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The SDK, or the subsystem being called, was not configured.
    #[error("SDK is not configured: {0}")]
    Config(String),

    /// Non-2xx response carrying an error envelope.
    #[error("{description}")]
    Client {
        status: u16,
        code: Option<String>,
        description: String,
    },

    /// Non-2xx response whose body is not an error envelope.
    #[error("{}", UNKNOWN_ERROR)]
    ClientUnknown { status: u16, body: String },

    /// No response was received.
    #[error("{}", SERVER_IS_NOT_RESPONDING)]
    Transport(#[source] TransportError),

    /// A path slot or required argument had no value.
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A 2xx body could not be read as the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A request payload could not be written as JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The social login web flow was abandoned before it produced a token.
    #[error("social authentication was cancelled")]
    SocialAuthCancelled,

    #[error("social authentication timed out after {0:?}")]
    SocialAuthTimeout(Duration),
}

/// Coarse category of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Client,
    ClientUnknown,
    Transport,
    Social,
    Invalid,
}

impl ApiError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn missing(parameter: impl Into<String>) -> Self {
        Self::MissingParameter(parameter.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Client { .. } => ErrorKind::Client,
            Self::ClientUnknown { .. } => ErrorKind::ClientUnknown,
            Self::Transport(_) => ErrorKind::Transport,
            Self::SocialAuthCancelled | Self::SocialAuthTimeout(_) => ErrorKind::Social,
            Self::MissingParameter(_)
            | Self::InvalidUrl(_)
            | Self::Deserialization(_)
            | Self::Serialization(_) => ErrorKind::Invalid,
        }
    }

    /// HTTP status of the response that caused this error, if one arrived.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::ClientUnknown { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}
