//! Error types for marionette operations.
//!
//! Remote failures keep the homeserver's `errcode` as a structured
//! [`ErrorCode`] so callers (and the intent gateway itself) can dispatch on
//! the kind of failure instead of inspecting message text.

use std::fmt;

use thiserror::Error;

/// Result type alias for marionette operations.
pub type MarionetteResult<T> = Result<T, MarionetteError>;

/// Main error type for all marionette operations.
#[derive(Error, Debug)]
pub enum MarionetteError {
    /// The homeserver answered with an error response.
    #[error("Homeserver error {code} (HTTP {status}): {message}")]
    Remote {
        status: u16,
        code: ErrorCode,
        message: String,
    },

    /// The request never produced a homeserver response.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A state snapshot could not be loaded.
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Homeserver error codes the intent layer cares about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Forbidden,
    UserInUse,
    NotFound,
    UnknownToken,
    MissingToken,
    LimitExceeded,
    BadJson,
    Exclusive,
    Unknown,
    /// Any errcode not listed above, kept verbatim.
    Other(String),
}

impl ErrorCode {
    /// Parse a wire `errcode` string.
    pub fn from_errcode(errcode: &str) -> Self {
        match errcode {
            "M_FORBIDDEN" => Self::Forbidden,
            "M_USER_IN_USE" => Self::UserInUse,
            "M_NOT_FOUND" => Self::NotFound,
            "M_UNKNOWN_TOKEN" => Self::UnknownToken,
            "M_MISSING_TOKEN" => Self::MissingToken,
            "M_LIMIT_EXCEEDED" => Self::LimitExceeded,
            "M_BAD_JSON" => Self::BadJson,
            "M_EXCLUSIVE" => Self::Exclusive,
            "M_UNKNOWN" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get the wire representation of the error code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Forbidden => "M_FORBIDDEN",
            Self::UserInUse => "M_USER_IN_USE",
            Self::NotFound => "M_NOT_FOUND",
            Self::UnknownToken => "M_UNKNOWN_TOKEN",
            Self::MissingToken => "M_MISSING_TOKEN",
            Self::LimitExceeded => "M_LIMIT_EXCEEDED",
            Self::BadJson => "M_BAD_JSON",
            Self::Exclusive => "M_EXCLUSIVE",
            Self::Unknown => "M_UNKNOWN",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MarionetteError {
    /// Create a homeserver error.
    pub fn remote(status: u16, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            code,
            message: message.into(),
        }
    }

    /// Shorthand for an `M_FORBIDDEN` response.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::remote(403, ErrorCode::Forbidden, message)
    }

    /// Shorthand for an `M_USER_IN_USE` response.
    pub fn user_in_use(message: impl Into<String>) -> Self {
        Self::remote(400, ErrorCode::UserInUse, message)
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// The homeserver error code, if this error came from the homeserver.
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Remote { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether the homeserver refused the request with `M_FORBIDDEN`.
    pub fn is_forbidden(&self) -> bool {
        self.code() == Some(&ErrorCode::Forbidden)
    }

    /// Whether registration failed because the username already exists.
    pub fn is_user_in_use(&self) -> bool {
        self.code() == Some(&ErrorCode::UserInUse)
    }
}
