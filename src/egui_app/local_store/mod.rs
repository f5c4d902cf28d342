//! # Local Key/Value Store
//!
//! Device-local persistent storage keyed by string. It holds the cached
//! session identity, the offline user table and UI preferences.
//!
//! ## Key Components
//!
//! - [`KeyValueStore`]: the storage capability every other module depends on
//! - [`SqliteStore`]: durable implementation on a single SQLite table
//! - [`MemoryStore`]: in-process implementation for tests and throwaway sessions
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tasksync::egui_app::local_store::{keys, KeyValueStore, SqliteStore};
//!
//! # async fn example() -> Result<(), tasksync::egui_app::local_store::StoreError> {
//! let store = SqliteStore::open_default().await?;
//! store.set(keys::THEME, "true").await?;
//! assert_eq!(store.get(keys::THEME).await?.as_deref(), Some("true"));
//! # Ok(())
//! # }
//! ```

pub mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Well-known storage keys
pub mod keys {
    /// Username or email of the signed-in user
    pub const CURRENT_USER: &str = "currentUser";
    /// Server user id (or the identifier for offline sessions)
    pub const CURRENT_USER_ID: &str = "currentUserId";
    /// Email given at signup
    pub const USER_EMAIL: &str = "userEmail";
    /// Offline user table, JSON object of identifier -> password
    pub const USERS: &str = "users";
    /// Dark mode flag, JSON boolean
    pub const THEME: &str = "theme";
    /// Profile image location
    pub const PROFILE_IMAGE: &str = "profileImage";

    /// Keys making up the session identity
    pub const SESSION: [&str; 3] = [CURRENT_USER, CURRENT_USER_ID, USER_EMAIL];
}

/// Errors from local storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("could not prepare storage directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value under '{key}' is not valid JSON: {message}")]
    Corrupt { key: String, message: String },
}

/// String-keyed persistent storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read a JSON value stored under `key`
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Store `value` as JSON under `key`
pub async fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set(key, &raw).await
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
