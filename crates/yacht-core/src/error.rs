//! Error types for the yacht analytics dashboard

use std::{error::Error as StdError, fmt};

/// Main error type shared by the dashboard crates
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// A backend remote procedure failed
    Backend {
        /// Procedure name
        procedure: String,
        /// Failure description
        message: String,
    },

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Transport-level HTTP failure outside a named procedure
    Http(String),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a backend error for a named procedure
    pub fn backend(procedure: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            procedure: procedure.into(),
            message: message.into(),
        }
    }

    /// Message suitable for an error panel in a view.
    ///
    /// Internal detail stays in the logs; the panel gets a short sentence.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "No data found for this call ID".to_string(),
            Self::Backend { .. } | Self::Http(_) | Self::Io(_) => {
                "Failed to load data from the backend".to_string()
            }
            Self::Serialization(_) => "The backend returned an unreadable response".to_string(),
            Self::Configuration { .. } | Self::Validation { .. } => {
                "The dashboard is misconfigured".to_string()
            }
            Self::Other(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Backend { procedure, message } => {
                write!(f, "Backend procedure {procedure} failed: {message}")
            }
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Http(msg) => write!(f, "HTTP error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}
