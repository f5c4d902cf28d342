/**
 * Authentication Module
 *
 * Remote-first login and signup with an offline fallback. The backend is
 * tried first; only when it cannot be reached at all does the flow switch to
 * the local credential table. A backend that answers and rejects the
 * credentials is authoritative.
 */

use crate::egui_app::api_client::{ApiClient, ApiError};
use crate::egui_app::local_store::{get_json, keys, set_json, KeyValueStore, StoreError};
use crate::egui_app::session::{Session, SessionManager};
use crate::egui_app::types::{LoginRequest, SignupRequest};
use crate::shared::SharedError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Authentication failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// Empty or mismatched form fields; nothing was sent anywhere
    #[error(transparent)]
    Validation(#[from] SharedError),

    /// The backend could not be reached
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The backend answered with a non-success status
    #[error("Server {status}: {body}")]
    ServerRejected { status: u16, body: String },

    /// The backend answered 2xx with a body we could not use
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Offline table has no matching entry
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Offline signup for a name that is already in the table
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl AuthError {
    /// Text for the alert shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(reason) => Self::NetworkUnavailable(reason),
            ApiError::Status { status, body } => Self::ServerRejected { status, body },
            ApiError::Decode(reason) => Self::UnexpectedResponse(reason),
        }
    }
}

/// Which credential store answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Reachable,
    Unreachable,
}

impl Connectivity {
    /// Only a transport failure counts as unreachable
    pub fn of<T>(result: &Result<T, AuthError>) -> Self {
        match result {
            Err(AuthError::NetworkUnavailable(_)) => Self::Unreachable,
            _ => Self::Reachable,
        }
    }
}

/// Something that can check credentials and register users
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn login(&self, identifier: &str, password: &str) -> Result<Session, AuthError>;

    async fn signup(&self, request: &SignupRequest) -> Result<Session, AuthError>;
}

/// Credentials checked by the backend
pub struct RemoteStore {
    api: ApiClient,
}

impl RemoteStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CredentialStore for RemoteStore {
    async fn login(&self, identifier: &str, password: &str) -> Result<Session, AuthError> {
        let request = LoginRequest {
            username: identifier.to_string(),
            password: password.to_string(),
        };
        let user = self.api.authenticate(&request).await?;
        // Without an id the session falls back to name-based todo lookups.
        let user_id = user
            .id
            .as_ref()
            .and_then(|id| id.as_user_id())
            .unwrap_or_else(|| identifier.to_string());
        Ok(Session::new(identifier, user_id).with_email(user.email))
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Session, AuthError> {
        let user = self.api.create_user(request).await?;
        let user_id = user
            .id
            .as_ref()
            .and_then(|id| id.as_user_id())
            .unwrap_or_else(|| request.username.clone());
        Ok(Session::new(request.username.clone(), user_id).with_email(request.email.clone()))
    }
}

/// Offline credential table kept in local storage
pub struct LocalStore {
    store: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn users(&self) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(get_json(self.store.as_ref(), keys::USERS)
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl CredentialStore for LocalStore {
    async fn login(&self, identifier: &str, password: &str) -> Result<Session, AuthError> {
        let users = self.users().await?;
        match users.get(identifier) {
            Some(stored) if stored == password => Ok(Session::new(identifier, identifier)),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Session, AuthError> {
        let mut users = self.users().await?;
        if users.contains_key(&request.username) {
            return Err(AuthError::UsernameTaken);
        }
        users.insert(request.username.clone(), request.password.clone());
        set_json(self.store.as_ref(), keys::USERS, &users).await?;
        Ok(Session::new(request.username.clone(), request.username.clone())
            .with_email(request.email.clone()))
    }
}

/// Login/signup orchestration
pub struct AuthFlow {
    remote: Box<dyn CredentialStore>,
    local: Box<dyn CredentialStore>,
    sessions: SessionManager,
}

impl AuthFlow {
    pub fn new(api: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_stores(
            Box::new(RemoteStore::new(api)),
            Box::new(LocalStore::new(store.clone())),
            SessionManager::new(store),
        )
    }

    pub fn with_stores(
        remote: Box<dyn CredentialStore>,
        local: Box<dyn CredentialStore>,
        sessions: SessionManager,
    ) -> Self {
        Self {
            remote,
            local,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Log in, persisting the session on success
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Session, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(SharedError::validation("credentials", "Please fill all fields").into());
        }

        let remote = self.remote.login(identifier, password).await;
        let session = match Connectivity::of(&remote) {
            Connectivity::Reachable => remote?,
            Connectivity::Unreachable => {
                tracing::warn!("[AUTH] Backend unreachable, checking offline users for {}", identifier);
                self.local.login(identifier, password).await?
            }
        };

        self.sessions.persist(&session).await?;
        tracing::info!("[AUTH] Logged in as {}", session.username);
        Ok(session)
    }

    /// Register a new user, persisting the session on success
    pub async fn signup(
        &self,
        identifier: &str,
        password: &str,
        confirm_password: &str,
        email: Option<&str>,
    ) -> Result<Session, AuthError> {
        let username = identifier.trim();
        if username.is_empty() || password.is_empty() || confirm_password.is_empty() {
            return Err(SharedError::validation("credentials", "Please fill all fields").into());
        }
        if password != confirm_password {
            return Err(SharedError::validation("confirm_password", "Passwords do not match").into());
        }

        let request = SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.map(str::trim).filter(|e| !e.is_empty()).map(str::to_string),
        };

        let remote = self.remote.signup(&request).await;
        let session = match Connectivity::of(&remote) {
            Connectivity::Reachable => remote?,
            Connectivity::Unreachable => {
                tracing::warn!("[AUTH] Backend unreachable, registering {} offline", username);
                self.local.signup(&request).await?
            }
        };

        self.sessions.persist(&session).await?;
        tracing::info!("[AUTH] Signed up as {}", session.username);
        Ok(session)
    }

    /// Forget the stored session
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear().await?;
        Ok(())
    }
}

/// Authentication state shown by the UI
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub authenticated: bool,
    pub session: Option<Session>,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }
}
