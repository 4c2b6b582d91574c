//! Error types for the listing feed
//!
//! Two layers live here. [`Error`] is the crate-wide error returned by
//! configuration loading, the HTTP client and the CLI. [`FetchError`] is the
//! narrow taxonomy the pagination core sees: every way a single page fetch
//! can fail collapses into either a network or a server failure.

use thiserror::Error;

/// Message shown to the user whenever a fetch fails
pub const USER_FACING_FETCH_MESSAGE: &str = "Failed to load listings. Please try again.";

/// The main error type for the listing feed
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("{0}")]
    Fetch(#[from] FetchError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Whether this error happened before a response was received
    pub fn is_network(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => !e.is_decode() && !e.is_status(),
            _ => false,
        }
    }
}

/// Result type alias for the listing feed
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single page fetch
///
/// Both variants are recoverable; the pagination core never retries on its
/// own and surfaces [`FetchError::user_message`] to the presentation layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection failure, timeout or transport error
    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-success status or a body that could not be parsed
    #[error("Server error: {message}")]
    Server {
        status: Option<u16>,
        message: String,
    },
}

impl FetchError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a server error
    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// HTTP status of a server error, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => *status,
            Self::Network { .. } => None,
        }
    }

    /// The opaque message shown to the user
    pub fn user_message(&self) -> &'static str {
        USER_FACING_FETCH_MESSAGE
    }
}

impl From<Error> for FetchError {
    fn from(err: Error) -> Self {
        match err {
            Error::HttpStatus { status, body } => {
                let message = if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                };
                FetchError::server(Some(status), message)
            }
            Error::Http(e) if e.is_decode() => FetchError::server(None, e.to_string()),
            Error::Http(e) => {
                let status = e.status().map(|s| s.as_u16());
                if let Some(status) = status {
                    FetchError::server(Some(status), e.to_string())
                } else {
                    FetchError::network(e.to_string())
                }
            }
            e @ Error::Timeout { .. } => FetchError::network(e.to_string()),
            Error::Fetch(e) => e,
            Error::JsonParse(e) => FetchError::server(None, format!("Malformed body: {e}")),
            other => FetchError::server(None, other.to_string()),
        }
    }
}
