//! Remote-first authentication with the offline fallback

use crate::common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;
use tasksync::egui_app::local_store::{keys, set_json};
use tasksync::egui_app::{AuthError, KeyValueStore, Session};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn seed_offline_user(store: &dyn KeyValueStore, username: &str, password: &str) {
    let users = BTreeMap::from([(username.to_string(), password.to_string())]);
    assert_ok!(set_json(store, keys::USERS, &users).await);
}

#[tokio::test]
async fn test_remote_login_persists_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/auth"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "username": "alice",
            "email": "alice@example.com",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (store, auth) = auth_flow(api_for(&server));
    let session = assert_ok!(auth.login("  alice ", "secret").await);

    assert_eq!(
        session,
        Session::new("alice", "42").with_email(Some("alice@example.com".to_string()))
    );
    assert_eq!(store.get(keys::CURRENT_USER).await.unwrap().as_deref(), Some("alice"));
    assert_eq!(store.get(keys::CURRENT_USER_ID).await.unwrap().as_deref(), Some("42"));
    assert_eq!(
        store.get(keys::USER_EMAIL).await.unwrap().as_deref(),
        Some("alice@example.com")
    );
    assert_eq!(auth.sessions().resolve().await.unwrap(), Some(session));
}

#[tokio::test]
async fn test_remote_login_without_id_uses_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let (_, auth) = auth_flow(api_for(&server));
    let session = assert_ok!(auth.login("alice", "secret").await);
    assert_eq!(session.user_id, "alice");
}

#[tokio::test]
async fn test_rejected_login_does_not_fall_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
        .mount(&server)
        .await;

    let (store, auth) = auth_flow(api_for(&server));
    seed_offline_user(&*store, "alice", "secret").await;

    let result = auth.login("alice", "secret").await;
    assert_err!(result, AuthError::ServerRejected { status: 401, .. });
    assert_eq!(store.get(keys::CURRENT_USER).await.unwrap(), None);
}

#[tokio::test]
async fn test_unreachable_backend_uses_offline_table() {
    let (store, auth) = auth_flow(unreachable_api());
    seed_offline_user(&*store, "alice", "secret").await;

    let session = assert_ok!(auth.login("alice", "secret").await);
    assert_eq!(session, Session::new("alice", "alice"));
    assert_eq!(store.get(keys::CURRENT_USER_ID).await.unwrap().as_deref(), Some("alice"));

    let result = auth.login("alice", "wrong").await;
    assert_err!(result, AuthError::InvalidCredentials);
}

#[tokio::test]
async fn test_offline_login_unknown_user() {
    let (_, auth) = auth_flow(unreachable_api());
    let result = auth.login("nobody", "pw").await;
    assert_err!(result, AuthError::InvalidCredentials);
}

#[tokio::test]
async fn test_remote_signup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_json(json!({
            "username": "bob",
            "password": "pw",
            "email": "bob@example.com",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "7", "username": "bob"})))
        .expect(1)
        .mount(&server)
        .await;

    let (store, auth) = auth_flow(api_for(&server));
    let session = assert_ok!(auth.signup("bob", "pw", "pw", Some("bob@example.com")).await);

    assert_eq!(session.user_id, "7");
    assert_eq!(session.email.as_deref(), Some("bob@example.com"));
    // Remote signups never touch the offline table.
    assert_eq!(store.get(keys::USERS).await.unwrap(), None);
}

#[tokio::test]
async fn test_remote_signup_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(409).set_body_string("Username already exists"))
        .mount(&server)
        .await;

    let (store, auth) = auth_flow(api_for(&server));
    let result = auth.signup("bob", "pw", "pw", None).await;

    match result {
        Err(e @ AuthError::ServerRejected { status: 409, .. }) => {
            assert_eq!(e.user_message(), "Server 409: Username already exists");
        }
        other => panic!("Expected 409 rejection, got {:?}", other),
    }
    assert_eq!(auth.sessions().resolve().await.unwrap(), None);
    assert_eq!(store.get(keys::USERS).await.unwrap(), None);
}

#[tokio::test]
async fn test_offline_signup_registers_locally() {
    let (store, auth) = auth_flow(unreachable_api());
    let session = assert_ok!(auth.signup("carol", "pw", "pw", None).await);
    assert_eq!(session, Session::new("carol", "carol"));

    let users = store.get(keys::USERS).await.unwrap().unwrap_or_default();
    assert!(users.contains("carol"));

    assert_ok!(auth.logout().await);
    let again = auth.signup("carol", "other", "other", None).await;
    assert_err!(again, AuthError::UsernameTaken);
}

#[tokio::test]
async fn test_validation_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (_, auth) = auth_flow(api_for(&server));
    let empty = auth.login("   ", "pw").await;
    assert_err!(empty, AuthError::Validation(_));

    let mismatch = auth.signup("dave", "a", "b", None).await;
    match mismatch {
        Err(e) => assert_eq!(e.user_message(), "Passwords do not match"),
        Ok(session) => panic!("Expected mismatch error, got {:?}", session),
    }
}
