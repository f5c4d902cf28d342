//! Session and preference persistence on the SQLite store

use pretty_assertions::assert_eq;
use std::sync::Arc;
use tasksync::egui_app::local_store::keys;
use tasksync::egui_app::{KeyValueStore, Preferences, Session, SessionManager, SqliteStore};

async fn open(path: &std::path::Path) -> Arc<dyn KeyValueStore> {
    Arc::new(assert_ok!(SqliteStore::open(path).await))
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local.db");
    let session = Session::new("alice", "42").with_email(Some("alice@example.com".to_string()));

    {
        let sessions = SessionManager::new(open(&path).await);
        assert_ok!(sessions.persist(&session).await);
    }

    let sessions = SessionManager::new(open(&path).await);
    assert_eq!(assert_ok!(sessions.resolve().await), Some(session));

    assert_ok!(sessions.clear().await);
    let sessions = SessionManager::new(open(&path).await);
    assert_eq!(assert_ok!(sessions.resolve().await), None);
}

#[tokio::test]
async fn test_preferences_survive_logout_and_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local.db");

    {
        let store = open(&path).await;
        let preferences = Preferences::new(store.clone());
        assert!(assert_ok!(preferences.toggle_dark_mode().await));
        assert_ok!(preferences.set_profile_image("file:///me.png").await);
        assert_ok!(SessionManager::new(store).clear().await);
    }

    let store = open(&path).await;
    let preferences = Preferences::new(store.clone());
    assert!(preferences.dark_mode().await);
    assert_eq!(
        assert_ok!(preferences.profile_image().await).as_deref(),
        Some("file:///me.png")
    );
    assert_eq!(assert_ok!(store.get(keys::THEME).await).as_deref(), Some("true"));
}
