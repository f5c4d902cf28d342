//! Shared Error Types
//!
//! Error types that every layer of the client can produce: form and draft
//! validation failures, and JSON (de)serialization failures at the storage or
//! wire boundary.
//!
//! # Usage
//!
//! ```rust
//! use tasksync::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "Please enter a task title");
//! assert_eq!(error.user_message(), "Please enter a task title");
//! ```
use thiserror::Error;

/// Errors shared between the storage, auth and todo layers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Input validation error, raised before any I/O happens
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Message shown to the user
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The text to put in front of the user, without the field prefix
    pub fn user_message(&self) -> &str {
        match self {
            Self::SerializationError { message } => message,
            Self::ValidationError { message, .. } => message,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
