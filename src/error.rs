//! Error types and handling for the `Farecast` application

use thiserror::Error;

/// Main error type for the `Farecast` application
#[derive(Error, Debug)]
pub enum FarecastError {
    /// Configuration-related errors (missing or invalid credentials/settings)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Document processing errors (corrupt or unreadable PDFs)
    #[error("Document error: {message}")]
    Document { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl FarecastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new document processing error
    pub fn document<S: Into<String>>(message: S) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FarecastError::Config { .. } => {
                "Configuration error. Please check your environment and API keys.".to_string()
            }
            FarecastError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            FarecastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            FarecastError::Document { message } => message.clone(),
            FarecastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            FarecastError::General { message } => message.clone(),
        }
    }
}

impl From<reqwest::Error> for FarecastError {
    fn from(err: reqwest::Error) -> Self {
        FarecastError::api(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = FarecastError::config("missing API key");
        assert!(matches!(config_err, FarecastError::Config { .. }));

        let api_err = FarecastError::api("connection failed");
        assert!(matches!(api_err, FarecastError::Api { .. }));

        let validation_err = FarecastError::validation("invalid date");
        assert!(matches!(validation_err, FarecastError::Validation { .. }));

        let document_err = FarecastError::document("unreadable PDF");
        assert!(matches!(document_err, FarecastError::Document { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = FarecastError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let api_err = FarecastError::api("test");
        assert!(api_err.user_message().contains("Unable to connect"));

        let validation_err = FarecastError::validation("bad date");
        assert!(validation_err.user_message().contains("bad date"));

        let document_err = FarecastError::document("Error processing PDF: truncated");
        assert!(document_err.user_message().contains("truncated"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let farecast_err: FarecastError = io_err.into();
        assert!(matches!(farecast_err, FarecastError::Io { .. }));
    }
}
