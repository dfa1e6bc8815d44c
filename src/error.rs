//! Error types for Config Hub
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Broad classification used by controllers to decide how an error is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401 from a backend, the session has been cleared
    Auth,
    /// Rejected locally before reaching the network
    Validation,
    /// Non-2xx answer carrying a server message
    Service,
    /// Backend unreachable or transport failure
    Network,
    /// Local plumbing (files, encoding, configuration)
    Internal,
}

/// Main error type for the application
#[derive(Debug, Snafu)]
pub enum Error {
    /// The backend rejected the bearer token
    #[snafu(display("Session expired. Please log in again."))]
    SessionExpired,

    /// Client-side validation failure
    #[snafu(display("{message}"))]
    Validation { message: String },

    /// Backend answered with a non-success status
    #[snafu(display("{message}"))]
    Service { status: u16, message: String },

    /// Request never produced an HTTP answer
    #[snafu(display("Network error: {message}"))]
    Network { message: String },

    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (file operations)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

impl Error {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SessionExpired => ErrorKind::Auth,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Service { .. } => ErrorKind::Service,
            Error::Network { .. } => ErrorKind::Network,
            _ => ErrorKind::Internal,
        }
    }

    /// HTTP status carried by a service error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Service { status, .. } => Some(*status),
            Error::SessionExpired => Some(401),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
