//! # Todo Synchronizer
//!
//! Keeps the local todo list in step with the server while making every user
//! action visible immediately.
//!
//! ## Architecture
//!
//! - `state_machine.rs`: the list, its `Synced`/`Pending*` states and the
//!   snapshot-based rollback
//! - `actor.rs`: a task that owns the list and applies commands one at a time
//!
//! [`TodoSynchronizer`] is the cloneable handle the UI talks to. Mutations are
//! sent to the actor; the current list is published on a `watch` channel and
//! every confirm or rollback on a `broadcast` channel.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tasksync::egui_app::todos::TodoSynchronizer;
//! use tasksync::egui_app::{ApiClient, Config};
//! use tasksync::shared::{OwnerKey, TodoDraft};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new(Config::load()?)?;
//! let todos = TodoSynchronizer::spawn(api, OwnerKey::parse("42"));
//!
//! todos.list().await?;
//! let created = todos.create(TodoDraft::new("Buy milk")).await?;
//! todos.toggle(created.id).await?;
//! # Ok(())
//! # }
//! ```

mod actor;
pub mod state_machine;

pub use state_machine::{
    Confirmation, ListSnapshot, ListState, MutationKind, SyncEvent, TodoList, TransitionError,
};

use crate::egui_app::api_client::{ApiClient, ApiError};
use crate::shared::{OwnerKey, SharedError, TodoDraft, TodoId, TodoItem};
use actor::{Command, TodoActor};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 64;

/// Errors returned by [`TodoSynchronizer`]
///
/// The `Display` text is the alert shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] SharedError),

    #[error("Could not load todos from server: {0}")]
    Load(ApiError),

    #[error("Could not add todo")]
    Create(#[source] ApiError),

    #[error("Could not update todo")]
    Toggle(#[source] ApiError),

    #[error("Could not delete todo")]
    Delete(#[source] ApiError),

    #[error("Todo {0} not found")]
    NotFound(TodoId),

    /// The server accepted a create but the refreshed list was empty
    #[error("Todo was added but is missing from the server list")]
    Unlisted,

    #[error("Todo list error: {0}")]
    Transition(TransitionError),

    #[error("Todo synchronizer is not running")]
    Closed,
}

impl SyncError {
    /// Text for the alert shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }

    /// Remote call failed and the optimistic change was rolled back
    pub fn is_rolled_back(&self) -> bool {
        matches!(self, Self::Create(_) | Self::Toggle(_) | Self::Delete(_))
    }

    /// The underlying API error, if any
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Load(e) | Self::Create(e) | Self::Toggle(e) | Self::Delete(e) => Some(e),
            _ => None,
        }
    }
}

/// Handle to one user's todo list
#[derive(Clone)]
pub struct TodoSynchronizer {
    owner: OwnerKey,
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<ListSnapshot>,
    events: broadcast::Sender<SyncEvent>,
}

impl TodoSynchronizer {
    /// Start the synchronizer on the current Tokio runtime
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, like `tokio::spawn`.
    pub fn spawn(api: ApiClient, owner: OwnerKey) -> Self {
        Self::spawn_on(&Handle::current(), api, owner)
    }

    /// Start the synchronizer on `runtime`
    pub fn spawn_on(runtime: &Handle, api: ApiClient, owner: OwnerKey) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(ListSnapshot::default());
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

        let actor = TodoActor::new(api, owner.clone(), command_rx, snapshot_tx, event_tx.clone());
        runtime.spawn(actor.run());

        Self {
            owner,
            commands: command_tx,
            snapshots: snapshot_rx,
            events: event_tx,
        }
    }

    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    /// Fetch the owner's todos and replace the local list with them
    ///
    /// On failure the current list is kept.
    pub async fn list(&self) -> Result<Vec<TodoItem>, SyncError> {
        self.request(|reply| Command::Load { reply }).await?;
        Ok(self.snapshot().items)
    }

    /// Add a todo
    ///
    /// A temporary item appears at the head of the list before the server
    /// answers. On success it is replaced in place by the server's record,
    /// which is returned.
    pub async fn create(&self, draft: TodoDraft) -> Result<TodoItem, SyncError> {
        self.request(|reply| Command::Create { draft, reply }).await
    }

    /// Flip the completion flag of `id`; returns the new flag
    pub async fn toggle(&self, id: TodoId) -> Result<bool, SyncError> {
        self.request(|reply| Command::Toggle { id, reply }).await
    }

    pub async fn delete(&self, id: TodoId) -> Result<(), SyncError> {
        self.request(|reply| Command::Delete { id, reply }).await
    }

    /// Current list and sync state
    pub fn snapshot(&self) -> ListSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every list change
    pub fn watch(&self) -> watch::Receiver<ListSnapshot> {
        self.snapshots.clone()
    }

    /// Receiver of confirm and rollback events
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<T, SyncError>>) -> Command,
    ) -> Result<T, SyncError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| SyncError::Closed)?;
        reply_rx.await.map_err(|_| SyncError::Closed)?
    }
}
