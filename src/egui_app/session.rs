//! Session Manager
//!
//! Resolves the signed-in identity from local storage at startup and keeps it
//! in sync on login, signup and logout.

use crate::egui_app::local_store::{keys, KeyValueStore, StoreError};
use crate::shared::OwnerKey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    /// Server id, or the identifier itself for offline sessions
    pub user_id: String,
    pub email: Option<String>,
}

impl Session {
    pub fn new(username: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            user_id: user_id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email.filter(|e| !e.trim().is_empty());
        self
    }

    /// Key used to load this user's todos
    pub fn owner_key(&self) -> OwnerKey {
        OwnerKey::parse(&self.user_id)
    }
}

/// Reads and writes the session keys of a [`KeyValueStore`]
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current session, if both username and user id are stored and non-empty
    pub async fn resolve(&self) -> Result<Option<Session>, StoreError> {
        let username = non_empty(self.store.get(keys::CURRENT_USER).await?);
        let user_id = non_empty(self.store.get(keys::CURRENT_USER_ID).await?);
        let email = non_empty(self.store.get(keys::USER_EMAIL).await?);

        match (username, user_id) {
            (Some(username), Some(user_id)) => {
                tracing::debug!("[SESSION] Resolved session for {}", username);
                Ok(Some(Session {
                    username,
                    user_id,
                    email,
                }))
            }
            _ => {
                tracing::debug!("[SESSION] No stored session");
                Ok(None)
            }
        }
    }

    /// Write the session keys
    pub async fn persist(&self, session: &Session) -> Result<(), StoreError> {
        self.store.set(keys::CURRENT_USER, &session.username).await?;
        self.store.set(keys::CURRENT_USER_ID, &session.user_id).await?;
        match &session.email {
            Some(email) => self.store.set(keys::USER_EMAIL, email).await?,
            None => self.store.remove(keys::USER_EMAIL).await?,
        }
        tracing::info!("[SESSION] Stored session for {}", session.username);
        Ok(())
    }

    /// Remove every session key. Idempotent.
    pub async fn clear(&self) -> Result<(), StoreError> {
        for key in keys::SESSION {
            self.store.remove(key).await?;
        }
        tracing::info!("[SESSION] Cleared session");
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
