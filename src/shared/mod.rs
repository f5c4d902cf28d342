//! Shared Module
//!
//! Platform-agnostic types used by every part of the client: the canonical
//! todo model, configuration records and shared error types. The only I/O is
//! [`AppConfig::from_toml_file`], which reads an optional config file.

/// Canonical todo model
pub mod todo;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use todo::{OwnerKey, Priority, TodoDraft, TodoId, TodoItem};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
