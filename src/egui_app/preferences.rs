//! Persisted UI preferences: dark mode and the profile image reference.

use crate::egui_app::local_store::{get_json, keys, set_json, KeyValueStore, StoreError};
use std::sync::Arc;

#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Missing or unreadable values mean light mode
    pub async fn dark_mode(&self) -> bool {
        match get_json::<bool>(self.store.as_ref(), keys::THEME).await {
            Ok(value) => value.unwrap_or(false),
            Err(e) => {
                tracing::error!("[PREFS] Error loading theme preference: {}", e);
                false
            }
        }
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<(), StoreError> {
        set_json(self.store.as_ref(), keys::THEME, &enabled).await
    }

    /// Flip dark mode and return the new value
    pub async fn toggle_dark_mode(&self) -> Result<bool, StoreError> {
        let enabled = !self.dark_mode().await;
        self.set_dark_mode(enabled).await?;
        Ok(enabled)
    }

    pub async fn profile_image(&self) -> Result<Option<String>, StoreError> {
        self.store.get(keys::PROFILE_IMAGE).await
    }

    pub async fn set_profile_image(&self, uri: &str) -> Result<(), StoreError> {
        self.store.set(keys::PROFILE_IMAGE, uri).await
    }
}
