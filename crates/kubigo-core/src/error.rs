//! Error types for kubigo-core
//!
//! Every variant's `Display` is the exact message shown to the workflow user,
//! so the runner can report `err.to_string()` without further formatting.

use thiserror::Error;

/// Result type alias for kubigo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for kubigo operations
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// HTTP 401 from the API
    #[error("Authentication failed. Please check your API key.")]
    Auth,

    /// HTTP 404 from the API, message is resource-specific
    #[error("{0}")]
    NotFound(String),

    /// HTTP 400 from the API
    #[error("{0}")]
    Request(String),

    /// Any other non-2xx status
    #[error("API Error ({status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// 2xx response carrying `"success": false`
    #[error("{0}")]
    DomainFailure(String),

    /// No response received (connect failure, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// I/O error while writing outputs or reading the event payload
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid runner configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything else
    #[error("Error: {0}")]
    Unknown(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unknown(format!("JSON error: {}", err))
    }
}

/// Fieldless error category for zero-cost pattern matching.
///
/// Single byte representation (`#[repr(u8)]`), `Copy`, no allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Missing or malformed input
    Validation,
    /// Authentication rejected
    Auth,
    /// Resource not found
    NotFound,
    /// Request rejected by the API
    Request,
    /// Unexpected HTTP status
    Api,
    /// API reported `success: false`
    DomainFailure,
    /// API unreachable
    Network,
    /// I/O operation error
    Io,
    /// Configuration error
    Config,
    /// Other errors
    Unknown,
}

impl ErrorKind {
    /// Stable name for logs and JSON output
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Auth => "auth",
            Self::NotFound => "not_found",
            Self::Request => "request",
            Self::Api => "api",
            Self::DomainFailure => "domain_failure",
            Self::Network => "network",
            Self::Io => "io",
            Self::Config => "config",
            Self::Unknown => "unknown",
        }
    }
}

impl Error {
    /// Get the error kind. Zero allocation, returns a Copy enum.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Auth => ErrorKind::Auth,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Request(_) => ErrorKind::Request,
            Error::Api { .. } => ErrorKind::Api,
            Error::DomainFailure(_) => ErrorKind::DomainFailure,
            Error::Network(_) => ErrorKind::Network,
            Error::Io(_) => ErrorKind::Io,
            Error::Config(_) => ErrorKind::Config,
            Error::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Borrow the error's detail message without allocating.
    ///
    /// For variants without a payload this is the fixed user-facing text.
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Error::Validation(msg)
            | Error::NotFound(msg)
            | Error::Request(msg)
            | Error::DomainFailure(msg)
            | Error::Network(msg)
            | Error::Config(msg)
            | Error::Unknown(msg) => msg,
            Error::Api { body, .. } => body,
            Error::Auth => "Authentication failed. Please check your API key.",
            Error::Io(_) => "I/O error",
        }
    }

    /// Validation error for a required input that is absent or blank
    pub fn missing_input(name: &str) -> Self {
        Error::Validation(format!(
            "Input \"{}\" is required but was not provided",
            name
        ))
    }

    /// True when the API answered (as opposed to network or local failures)
    pub fn is_api_response(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Auth
                | ErrorKind::NotFound
                | ErrorKind::Request
                | ErrorKind::Api
                | ErrorKind::DomainFailure
        )
    }
}
