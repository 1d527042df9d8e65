//! Error types for pipefolio.
//!
//! Every failure here is local and user-facing: none of them is allowed to
//! take the walkthrough down. The contact errors carry the exact wording
//! shown to the visitor.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for pipefolio operations.
#[derive(Debug, Error)]
pub enum PipefolioError {
    /// A contact submission was refused or failed.
    #[error("{0}")]
    Contact(#[from] ContactError),

    /// Reading or writing the local store failed.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// Today's submissions have reached the daily ceiling.
    #[error("Daily transmission limit reached ({limit}/{limit}). Please try again tomorrow.")]
    LimitReached {
        /// The daily ceiling.
        limit: u32,
    },

    /// The outbound send failed. The form keeps its contents.
    #[error("Failed to send transmission: {reason}")]
    SendFailed {
        /// What the sender reported.
        reason: String,
    },

    /// A submission is already in flight.
    #[error("A transmission is already in progress")]
    InFlight,
}

impl ContactError {
    /// Creates a send failure.
    #[must_use]
    pub fn send_failed(reason: impl Into<String>) -> Self {
        Self::SendFailed {
            reason: reason.into(),
        }
    }
}

impl From<SendError> for ContactError {
    fn from(err: SendError) -> Self {
        Self::send_failed(err.to_string())
    }
}

/// Errors from the outbound message sender.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The service answered with a non-success status.
    #[error("{body} (status {status})")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response text.
        body: String,
    },

    /// The request never got an answer.
    #[error("{0}")]
    Transport(String),

    /// The sender is not configured.
    #[error("Email service not configured: {0}")]
    NotConfigured(String),
}

/// Errors from the local key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("Storage IO error at {path}: {source}")]
    Io {
        /// The backing file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object of strings.
    #[error("Storage file {path} is corrupt: {source}")]
    Corrupt {
        /// The backing file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Cannot read config {path}: {source}")]
    Read {
        /// The config file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid.
    #[error("Invalid config {path}: {source}")]
    Parse {
        /// The config file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// An environment override has the wrong shape.
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },

    /// A setting parsed but is out of range.
    #[error("Invalid {field}: {reason}")]
    OutOfRange {
        /// Dotted path of the setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_message_names_ceiling() {
        let err = ContactError::LimitReached { limit: 5 };
        assert_eq!(
            err.to_string(),
            "Daily transmission limit reached (5/5). Please try again tomorrow."
        );
    }

    #[test]
    fn test_send_error_converts_to_contact_error() {
        let err: ContactError = SendError::Rejected {
            status: 400,
            body: "The template ID is invalid".to_string(),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "Failed to send transmission: The template ID is invalid (status 400)"
        );
    }

    #[test]
    fn test_umbrella_from() {
        let err: PipefolioError = ContactError::InFlight.into();
        assert!(matches!(err, PipefolioError::Contact(ContactError::InFlight)));
    }
}
