//! Error types and handling for the Vietnam Discovery service

use thiserror::Error;

/// Main error type for the discovery service.
///
/// Weather lookup failures are deliberately not part of this taxonomy: the
/// enricher absorbs them and reports the weather as absent instead.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Input validation errors (empty query, bad request shape)
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The upstream service had no match for the query
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Transport failure or malformed payload from an upstream service
    #[error("Service error: {message}")]
    Service { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DiscoveryError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new service error
    pub fn service<S: Into<String>>(message: S) -> Self {
        Self::Service {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message for the error banner
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DiscoveryError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            DiscoveryError::NotFound { message } => message.clone(),
            DiscoveryError::Service { .. } => {
                "Unable to reach external services. Please check your internet connection."
                    .to_string()
            }
            DiscoveryError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            DiscoveryError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
