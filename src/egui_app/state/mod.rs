use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Runtime;

use crate::egui_app::api_client::{ApiClient, ApiError};
use crate::egui_app::auth::{AuthError, AuthFlow, AuthState};
use crate::egui_app::local_store::{KeyValueStore, MemoryStore, SqliteStore};
use crate::egui_app::preferences::Preferences;
use crate::egui_app::session::Session;
use crate::egui_app::todos::{ListSnapshot, TodoSynchronizer};
use crate::egui_app::{AppView, Config};
use crate::shared::{Priority, TodoDraft, TodoId};

/// Failures that keep the app from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("could not start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("could not build HTTP client: {0}")]
    Api(#[from] ApiError),
}

/// Alert sender stamped with the session it was created in
#[derive(Clone)]
struct AlertSender {
    epoch: u64,
    tx: Sender<(u64, String)>,
}

impl AlertSender {
    fn send(&self, message: impl Into<String>) {
        let _ = self.tx.send((self.epoch, message.into()));
    }
}

/// Central application state shared across egui views.
///
/// Async work runs on the owned Tokio runtime; results come back over std
/// channels that the UI drains once per frame.
pub struct AppState {
    runtime: Runtime,
    api: ApiClient,
    auth: Arc<AuthFlow>,
    preferences: Preferences,
    todos: Option<TodoSynchronizer>,

    pub config: Config,
    pub auth_state: AuthState,
    pub current_view: AppView,
    pub username_input: String,
    pub email_input: String,
    pub password_input: String,
    pub confirm_password_input: String,
    pub is_signup_mode: bool,
    pub auth_result: Option<Receiver<Result<Session, AuthError>>>,

    pub title_input: String,
    pub description_input: String,
    pub priority_input: Priority,
    pub search_query: String,
    /// Latest list published by the synchronizer
    pub todo_snapshot: ListSnapshot,
    pub loading_todos: bool,

    /// Alert currently shown; more may be queued behind it
    pub alert: Option<String>,
    /// Logout was requested and waits for confirmation
    pub confirm_logout: bool,
    /// Bumped on every login and logout; results from older sessions are dropped
    session_epoch: u64,
    alert_tx: Sender<(u64, String)>,
    alert_rx: Receiver<(u64, String)>,
    load_done_tx: Sender<u64>,
    load_done_rx: Receiver<u64>,

    pub dark_mode: bool,
    pub profile_image_input: String,
}

impl AppState {
    pub fn new() -> Result<Self, StartupError> {
        let runtime = Runtime::new()?;

        let config = Config::load().unwrap_or_else(|e| {
            tracing::warn!("[CONFIG] Falling back to defaults: {}", e);
            Config::new()
        });
        let store: Arc<dyn KeyValueStore> = match runtime.block_on(SqliteStore::open_default()) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!("[STORE] Local database unavailable, using memory: {}", e);
                Arc::new(MemoryStore::new())
            }
        };

        Self::build(runtime, config, store)
    }

    fn build(
        runtime: Runtime,
        config: Config,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, StartupError> {
        tracing::info!("[CONFIG] Backend at {}", config.server_url());
        let api = ApiClient::new(config.clone())?;
        let auth = Arc::new(AuthFlow::new(api.clone(), store.clone()));
        let preferences = Preferences::new(store);

        let (session, dark_mode, profile_image) = runtime.block_on(async {
            let session = auth.sessions().resolve().await.unwrap_or_else(|e| {
                tracing::error!("[SESSION] Could not read stored session: {}", e);
                None
            });
            let profile_image = preferences.profile_image().await.ok().flatten();
            (session, preferences.dark_mode().await, profile_image)
        });

        let (alert_tx, alert_rx) = channel();
        let (load_done_tx, load_done_rx) = channel();

        let mut state = Self {
            runtime,
            api,
            auth,
            preferences,
            todos: None,
            config,
            auth_state: AuthState::new(),
            current_view: AppView::Auth,
            username_input: String::new(),
            email_input: String::new(),
            password_input: String::new(),
            confirm_password_input: String::new(),
            is_signup_mode: false,
            auth_result: None,
            title_input: String::new(),
            description_input: String::new(),
            priority_input: Priority::default(),
            search_query: String::new(),
            todo_snapshot: ListSnapshot::default(),
            loading_todos: false,
            alert: None,
            confirm_logout: false,
            session_epoch: 0,
            alert_tx,
            alert_rx,
            load_done_tx,
            load_done_rx,
            dark_mode,
            profile_image_input: profile_image.unwrap_or_default(),
        };

        if let Some(session) = session {
            state.enter_session(session);
        }
        Ok(state)
    }

    /// Drain async results. Call once per frame before rendering.
    pub fn poll(&mut self) {
        self.check_auth_result();

        while let Ok(epoch) = self.load_done_rx.try_recv() {
            if epoch == self.session_epoch {
                self.loading_todos = false;
            }
        }
        if self.alert.is_none() {
            while let Ok((epoch, message)) = self.alert_rx.try_recv() {
                if epoch == self.session_epoch {
                    self.alert = Some(message);
                    break;
                }
                tracing::debug!("[SESSION] Dropped alert from ended session: {}", message);
            }
        }
        if let Some(todos) = &self.todos {
            self.todo_snapshot = todos.snapshot();
        }
    }

    pub fn check_auth_result(&mut self) {
        if let Some(ref rx) = self.auth_result {
            if let Ok(result) = rx.try_recv() {
                self.auth_result = None;
                self.auth_state.loading = false;

                match result {
                    Ok(session) => {
                        self.password_input.clear();
                        self.confirm_password_input.clear();
                        self.is_signup_mode = false;
                        self.enter_session(session);
                    }
                    Err(e) => {
                        tracing::warn!("[AUTH] Authentication failed: {}", e);
                        self.auth_state.set_error(e.user_message());
                    }
                }
            }
        }
    }

    pub fn handle_login(&mut self) {
        self.auth_state.loading = true;
        self.auth_state.error = None;

        let auth = self.auth.clone();
        let username = self.username_input.clone();
        let password = self.password_input.clone();

        let (tx, rx) = channel();
        self.runtime.spawn(async move {
            let _ = tx.send(auth.login(&username, &password).await);
        });
        self.auth_result = Some(rx);
    }

    pub fn handle_signup(&mut self) {
        self.auth_state.loading = true;
        self.auth_state.error = None;

        let auth = self.auth.clone();
        let username = self.username_input.clone();
        let email = self.email_input.clone();
        let password = self.password_input.clone();
        let confirm = self.confirm_password_input.clone();

        let (tx, rx) = channel();
        self.runtime.spawn(async move {
            let result = auth.signup(&username, &password, &confirm, Some(&email)).await;
            let _ = tx.send(result);
        });
        self.auth_result = Some(rx);
    }

    /// Ask for confirmation before logging out
    pub fn request_logout(&mut self) {
        self.confirm_logout = true;
    }

    pub fn cancel_logout(&mut self) {
        self.confirm_logout = false;
    }

    /// Clear the stored session, then return to the auth view
    ///
    /// The clear finishes before this returns, so a following login cannot
    /// be overwritten by it.
    pub fn logout(&mut self) {
        self.confirm_logout = false;
        let cleared = self.runtime.block_on(self.auth.logout());

        self.session_epoch += 1;
        if let Err(e) = cleared {
            tracing::error!("[AUTH] Logout failed: {}", e);
            self.alert = Some(e.user_message());
        }

        self.todos = None;
        self.loading_todos = false;
        self.todo_snapshot = ListSnapshot::default();
        self.auth_state = AuthState::new();
        self.current_view = AppView::Auth;
        self.username_input.clear();
        self.email_input.clear();
        self.password_input.clear();
        self.confirm_password_input.clear();
        self.search_query.clear();
    }

    pub fn toggle_auth_mode(&mut self) {
        self.is_signup_mode = !self.is_signup_mode;
        self.auth_state.clear_error();
        self.password_input.clear();
        self.confirm_password_input.clear();
    }

    pub fn session(&self) -> Option<&Session> {
        self.auth_state.session.as_ref()
    }

    /// Re-fetch the list from the server
    pub fn refresh_todos(&mut self) {
        let Some(todos) = self.todos.clone() else {
            return;
        };
        self.loading_todos = true;
        let alerts = self.alerts();
        let done = self.load_done_tx.clone();
        let epoch = self.session_epoch;
        self.runtime.spawn(async move {
            if let Err(e) = todos.list().await {
                alerts.send(e.user_message());
            }
            let _ = done.send(epoch);
        });
    }

    /// Create a todo from the form inputs
    ///
    /// The form is cleared as soon as the draft is accepted locally.
    pub fn add_todo(&mut self) {
        let Some(todos) = self.todos.clone() else {
            return;
        };
        let mut draft = TodoDraft::new(self.title_input.clone()).with_priority(self.priority_input);
        if !self.description_input.trim().is_empty() {
            draft = draft.with_description(self.description_input.clone());
        }
        let draft = match draft.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.alert = Some(e.user_message().to_string());
                return;
            }
        };

        self.title_input.clear();
        self.description_input.clear();
        self.priority_input = Priority::default();

        let alerts = self.alerts();
        self.runtime.spawn(async move {
            if let Err(e) = todos.create(draft).await {
                alerts.send(e.user_message());
            }
        });
    }

    pub fn toggle_todo(&mut self, id: TodoId) {
        let Some(todos) = self.todos.clone() else {
            return;
        };
        let alerts = self.alerts();
        self.runtime.spawn(async move {
            if let Err(e) = todos.toggle(id).await {
                alerts.send(e.user_message());
            }
        });
    }

    pub fn delete_todo(&mut self, id: TodoId) {
        let Some(todos) = self.todos.clone() else {
            return;
        };
        let alerts = self.alerts();
        self.runtime.spawn(async move {
            if let Err(e) = todos.delete(id).await {
                alerts.send(e.user_message());
            }
        });
    }

    /// Flip the theme now and persist it in the background
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        let preferences = self.preferences.clone();
        let enabled = self.dark_mode;
        let alerts = self.alerts();
        self.runtime.spawn(async move {
            if let Err(e) = preferences.set_dark_mode(enabled).await {
                tracing::error!("[PREFS] Error saving theme preference: {}", e);
                alerts.send("Could not save theme preference");
            }
        });
    }

    pub fn save_profile_image(&mut self) {
        let preferences = self.preferences.clone();
        let uri = self.profile_image_input.trim().to_string();
        let alerts = self.alerts();
        self.runtime.spawn(async move {
            if let Err(e) = preferences.set_profile_image(&uri).await {
                tracing::error!("[PREFS] Error saving profile image: {}", e);
                alerts.send("Could not save profile image");
            }
        });
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    fn alerts(&self) -> AlertSender {
        AlertSender {
            epoch: self.session_epoch,
            tx: self.alert_tx.clone(),
        }
    }

    fn enter_session(&mut self, session: Session) {
        tracing::info!("[SESSION] Signed in as {}", session.username);
        self.session_epoch += 1;
        let todos = TodoSynchronizer::spawn_on(self.runtime.handle(), self.api.clone(), session.owner_key());
        self.todos = Some(todos);
        self.auth_state.authenticated = true;
        self.auth_state.session = Some(session);
        self.auth_state.error = None;
        self.current_view = AppView::Todos;
        self.refresh_todos();
    }
}
