//! # Todo List State Machine
//!
//! Optimistic mutations on the in-memory todo list.
//!
//! The list is either `Synced` or has exactly one mutation in flight
//! (`PendingCreate`, `PendingToggle`, `PendingDelete`). Starting a mutation
//! applies it to the list immediately and keeps a full snapshot of the list as
//! it was before. The mutation then ends in one of two transitions:
//!
//! - **confirm**: the server accepted it; the optimistic list stays, with the
//!   temporary id of a create swapped for the server's record
//! - **rollback**: the server call failed; the snapshot is restored verbatim
//!
//! Both transitions produce a [`SyncEvent`] and return the list to `Synced`.
//!
//! ## Usage
//!
//! ```rust
//! use tasksync::egui_app::todos::{Confirmation, ListState, TodoList};
//! use tasksync::shared::{TodoDraft, TodoId};
//!
//! let mut list = TodoList::new();
//! let draft = TodoDraft::new("Buy milk").validate().unwrap();
//! list.begin_create(draft.to_pending_item(TodoId::temporary(1), None)).unwrap();
//! assert!(matches!(list.state(), ListState::PendingCreate { .. }));
//!
//! list.rollback("Server returned 500").unwrap();
//! assert!(list.is_empty());
//! ```

use crate::shared::{TodoId, TodoItem};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Kind of optimistic mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    Create,
    Toggle,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Toggle => write!(f, "toggle"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Synchronization state of the whole list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListState {
    /// No mutation in flight
    #[default]
    Synced,
    /// A temporary item sits at the head of the list
    PendingCreate { temp_id: TodoId },
    /// An item's completion flag was flipped locally
    PendingToggle { id: TodoId },
    /// An item was removed locally
    PendingDelete { id: TodoId },
}

impl ListState {
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced)
    }

    pub fn kind(&self) -> Option<MutationKind> {
        match self {
            Self::Synced => None,
            Self::PendingCreate { .. } => Some(MutationKind::Create),
            Self::PendingToggle { .. } => Some(MutationKind::Toggle),
            Self::PendingDelete { .. } => Some(MutationKind::Delete),
        }
    }
}

/// Outcome of a pending mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncEvent {
    Confirmed {
        operation_id: Uuid,
        kind: MutationKind,
    },
    RolledBack {
        operation_id: Uuid,
        kind: MutationKind,
        reason: String,
    },
}

impl SyncEvent {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Confirmed { kind, .. } | Self::RolledBack { kind, .. } => *kind,
        }
    }

    pub fn is_rollback(&self) -> bool {
        matches!(self, Self::RolledBack { .. })
    }
}

/// How the server confirmed a pending mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// Toggle or delete went through; keep the optimistic list as is
    Accepted,
    /// Create went through; swap the temporary entry for this record
    Created(TodoItem),
    /// Create went through but the list had to be fetched again
    Reloaded(Vec<TodoItem>),
}

/// Invalid transitions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("another {0} is still pending")]
    Busy(MutationKind),

    #[error("todo {0} not found")]
    NotFound(TodoId),

    #[error("todo {0} is already in the list")]
    DuplicateId(TodoId),

    #[error("no mutation is pending")]
    NothingPending,

    #[error("confirmation does not match the pending {0}")]
    Mismatch(MutationKind),
}

#[derive(Debug, Clone)]
struct Pending {
    operation_id: Uuid,
    state: ListState,
    snapshot: Vec<TodoItem>,
}

/// Read-only view of the list handed to the UI
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListSnapshot {
    pub items: Vec<TodoItem>,
    pub state: ListState,
}

impl ListSnapshot {
    /// Items whose title contains `query`, ignoring case
    pub fn filtered(&self, query: &str) -> Vec<&TodoItem> {
        self.items
            .iter()
            .filter(|item| item.matches_query(query))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }
}

/// The ordered todo list with at most one optimistic mutation in flight
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    items: Vec<TodoItem>,
    pending: Option<Pending>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &TodoId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn state(&self) -> ListState {
        self.pending
            .as_ref()
            .map(|pending| pending.state.clone())
            .unwrap_or(ListState::Synced)
    }

    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            items: self.items.clone(),
            state: self.state(),
        }
    }

    /// Replace the whole list with freshly fetched items
    pub fn replace_all(&mut self, items: Vec<TodoItem>) -> Result<(), TransitionError> {
        self.ensure_synced()?;
        self.items = dedup_by_id(items);
        Ok(())
    }

    /// Insert `item` at the head of the list
    pub fn begin_create(&mut self, item: TodoItem) -> Result<Uuid, TransitionError> {
        self.ensure_synced()?;
        if self.contains(&item.id) {
            return Err(TransitionError::DuplicateId(item.id));
        }
        let state = ListState::PendingCreate {
            temp_id: item.id.clone(),
        };
        let operation_id = self.start(state);
        self.items.insert(0, item);
        Ok(operation_id)
    }

    /// Flip the completion flag of `id` in place; returns the new flag
    pub fn begin_toggle(&mut self, id: &TodoId) -> Result<(Uuid, bool), TransitionError> {
        self.ensure_synced()?;
        let index = self
            .position(id)
            .ok_or_else(|| TransitionError::NotFound(id.clone()))?;
        let operation_id = self.start(ListState::PendingToggle { id: id.clone() });
        let item = &mut self.items[index];
        item.completed = !item.completed;
        Ok((operation_id, item.completed))
    }

    /// Remove `id` from the list; returns the removed item
    pub fn begin_delete(&mut self, id: &TodoId) -> Result<(Uuid, TodoItem), TransitionError> {
        self.ensure_synced()?;
        let index = self
            .position(id)
            .ok_or_else(|| TransitionError::NotFound(id.clone()))?;
        let operation_id = self.start(ListState::PendingDelete { id: id.clone() });
        Ok((operation_id, self.items.remove(index)))
    }

    /// Keep the optimistic change and return to `Synced`
    pub fn confirm(&mut self, confirmation: Confirmation) -> Result<SyncEvent, TransitionError> {
        let pending = self.pending.as_ref().ok_or(TransitionError::NothingPending)?;
        let kind = pending.state.kind().ok_or(TransitionError::NothingPending)?;
        let temp_id = match &pending.state {
            ListState::PendingCreate { temp_id } => Some(temp_id.clone()),
            _ => None,
        };

        match (temp_id, confirmation) {
            (Some(temp_id), Confirmation::Created(created)) => {
                self.swap_in_created(&temp_id, created);
            }
            (Some(_), Confirmation::Reloaded(items)) => {
                self.items = dedup_by_id(items);
            }
            (None, Confirmation::Accepted) => {}
            _ => return Err(TransitionError::Mismatch(kind)),
        }

        let pending = self.pending.take().ok_or(TransitionError::NothingPending)?;
        Ok(SyncEvent::Confirmed {
            operation_id: pending.operation_id,
            kind,
        })
    }

    /// Restore the pre-mutation snapshot and return to `Synced`
    pub fn rollback(&mut self, reason: impl Into<String>) -> Result<SyncEvent, TransitionError> {
        let pending = self.pending.take().ok_or(TransitionError::NothingPending)?;
        let kind = pending.state.kind().ok_or(TransitionError::NothingPending)?;
        self.items = pending.snapshot;
        Ok(SyncEvent::RolledBack {
            operation_id: pending.operation_id,
            kind,
            reason: reason.into(),
        })
    }

    fn ensure_synced(&self) -> Result<(), TransitionError> {
        match self.state().kind() {
            Some(kind) => Err(TransitionError::Busy(kind)),
            None => Ok(()),
        }
    }

    fn start(&mut self, state: ListState) -> Uuid {
        let operation_id = Uuid::new_v4();
        self.pending = Some(Pending {
            operation_id,
            state,
            snapshot: self.items.clone(),
        });
        operation_id
    }

    fn position(&self, id: &TodoId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Replace the temporary entry in place. Any other entry already carrying
    /// the server id is dropped so ids stay unique.
    fn swap_in_created(&mut self, temp_id: &TodoId, created: TodoItem) {
        self.items
            .retain(|item| &item.id == temp_id || item.id != created.id);
        match self.position(temp_id) {
            Some(index) => self.items[index] = created,
            None => self.items.insert(0, created),
        }
    }
}

fn dedup_by_id(items: Vec<TodoItem>) -> Vec<TodoItem> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}
