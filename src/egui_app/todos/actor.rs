//! Single-writer task owning one user's [`TodoList`].
//!
//! Commands are processed strictly one after another. Each mutation runs its
//! whole lifecycle (apply, publish, remote call, confirm or rollback, publish)
//! before the next command is read, so a rollback snapshot can never include
//! or erase another mutation's effects.

use super::state_machine::{Confirmation, ListSnapshot, SyncEvent, TodoList};
use super::SyncError;
use crate::egui_app::api_client::ApiClient;
use crate::egui_app::types::NewTodoRequest;
use crate::shared::{OwnerKey, TodoDraft, TodoId, TodoItem};
use std::collections::HashSet;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

pub(crate) type Reply<T> = oneshot::Sender<Result<T, SyncError>>;

pub(crate) enum Command {
    Load { reply: Reply<usize> },
    Create { draft: TodoDraft, reply: Reply<TodoItem> },
    Toggle { id: TodoId, reply: Reply<bool> },
    Delete { id: TodoId, reply: Reply<()> },
}

pub(crate) struct TodoActor {
    api: ApiClient,
    owner: OwnerKey,
    list: TodoList,
    commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<ListSnapshot>,
    events: broadcast::Sender<SyncEvent>,
    last_temp_millis: i64,
}

impl TodoActor {
    pub(crate) fn new(
        api: ApiClient,
        owner: OwnerKey,
        commands: mpsc::Receiver<Command>,
        snapshots: watch::Sender<ListSnapshot>,
        events: broadcast::Sender<SyncEvent>,
    ) -> Self {
        Self {
            api,
            owner,
            list: TodoList::new(),
            commands,
            snapshots,
            events,
            last_temp_millis: 0,
        }
    }

    /// Runs until every [`TodoSynchronizer`](super::TodoSynchronizer) handle is dropped
    pub(crate) async fn run(mut self) {
        tracing::debug!("[TODOS] Synchronizer started for {}", self.owner);
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Load { reply } => {
                    let result = self.load().await;
                    let _ = reply.send(result);
                }
                Command::Create { draft, reply } => {
                    let result = self.create(draft).await;
                    let _ = reply.send(result);
                }
                Command::Toggle { id, reply } => {
                    let result = self.toggle(id).await;
                    let _ = reply.send(result);
                }
                Command::Delete { id, reply } => {
                    let result = self.delete(id).await;
                    let _ = reply.send(result);
                }
            }
        }
        tracing::debug!("[TODOS] Synchronizer stopped for {}", self.owner);
    }

    async fn load(&mut self) -> Result<usize, SyncError> {
        let items = self.api.list_todos(&self.owner).await.map_err(|e| {
            tracing::error!("[TODOS] Error loading todos: {}", e);
            SyncError::Load(e)
        })?;
        self.list.replace_all(items).map_err(SyncError::Transition)?;
        self.publish();
        tracing::info!("[TODOS] Loaded {} todos for {}", self.list.len(), self.owner);
        Ok(self.list.len())
    }

    async fn create(&mut self, draft: TodoDraft) -> Result<TodoItem, SyncError> {
        let draft = draft.validate()?;
        let temp_id = self.next_temp_id();
        let user_id = self.owner.numeric_id();
        let known_ids: HashSet<TodoId> = self.list.items().iter().map(|i| i.id.clone()).collect();

        self.list
            .begin_create(draft.to_pending_item(temp_id, user_id))
            .map_err(SyncError::Transition)?;
        self.publish();

        let request = NewTodoRequest {
            title: draft.title.clone(),
            description: draft.description.clone(),
            priority: draft.priority,
            user_id,
        };

        let created = match self.api.create_todo(&request).await {
            Ok(Some(created)) => {
                self.confirm(Confirmation::Created(created.clone()))?;
                created
            }
            Ok(None) => {
                // Accepted without a usable record; fetch the list to learn the id.
                let items = match self.api.list_todos(&self.owner).await {
                    Ok(items) => items,
                    Err(e) => {
                        tracing::error!("[TODOS] Error reloading after create: {}", e);
                        self.rollback(e.to_string())?;
                        return Err(SyncError::Create(e));
                    }
                };
                let created = find_created(&items, &known_ids, &draft.title);
                self.confirm(Confirmation::Reloaded(items))?;
                created.ok_or(SyncError::Unlisted)?
            }
            Err(e) => {
                tracing::error!("[TODOS] Error creating todo: {}", e);
                self.rollback(e.to_string())?;
                return Err(SyncError::Create(e));
            }
        };

        tracing::info!("[TODOS] Created todo {}", created.id);
        Ok(created)
    }

    async fn toggle(&mut self, id: TodoId) -> Result<bool, SyncError> {
        let server_id = self.server_id(&id)?;
        let (_, completed) = self.list.begin_toggle(&id).map_err(SyncError::Transition)?;
        self.publish();

        match self.api.update_todo(server_id, completed).await {
            Ok(()) => {
                self.confirm(Confirmation::Accepted)?;
                Ok(completed)
            }
            Err(e) => {
                tracing::error!("[TODOS] Error updating todo {}: {}", id, e);
                self.rollback(e.to_string())?;
                Err(SyncError::Toggle(e))
            }
        }
    }

    async fn delete(&mut self, id: TodoId) -> Result<(), SyncError> {
        let server_id = self.server_id(&id)?;
        self.list.begin_delete(&id).map_err(SyncError::Transition)?;
        self.publish();

        match self.api.delete_todo(server_id).await {
            Ok(()) => {
                self.confirm(Confirmation::Accepted)?;
                Ok(())
            }
            Err(e) => {
                tracing::error!("[TODOS] Error deleting todo {}: {}", id, e);
                self.rollback(e.to_string())?;
                Err(SyncError::Delete(e))
            }
        }
    }

    /// Only confirmed items can be toggled or deleted; temp ids never reach the server.
    fn server_id(&self, id: &TodoId) -> Result<u64, SyncError> {
        match id.server_id() {
            Some(server_id) if self.list.contains(id) => Ok(server_id),
            _ => Err(SyncError::NotFound(id.clone())),
        }
    }

    fn next_temp_id(&mut self) -> TodoId {
        let mut millis = chrono::Utc::now().timestamp_millis().max(self.last_temp_millis + 1);
        while self.list.contains(&TodoId::temporary(millis)) {
            millis += 1;
        }
        self.last_temp_millis = millis;
        TodoId::temporary(millis)
    }

    fn confirm(&mut self, confirmation: Confirmation) -> Result<(), SyncError> {
        let event = self.list.confirm(confirmation).map_err(SyncError::Transition)?;
        self.finish(event);
        Ok(())
    }

    fn rollback(&mut self, reason: String) -> Result<(), SyncError> {
        let event = self.list.rollback(reason).map_err(SyncError::Transition)?;
        tracing::warn!("[TODOS] Rolled back {}", event.kind());
        self.finish(event);
        Ok(())
    }

    fn finish(&mut self, event: SyncEvent) {
        self.publish();
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.list.snapshot());
    }
}

/// Pick the created item out of a refreshed list.
///
/// Ids that were not known before the create are the candidates; a matching
/// title breaks ties. With no new id the head of the list is taken.
fn find_created(items: &[TodoItem], known_ids: &HashSet<TodoId>, title: &str) -> Option<TodoItem> {
    let mut fresh = items.iter().filter(|item| !known_ids.contains(&item.id));
    let first_fresh = fresh.clone().next();
    fresh
        .find(|item| item.title.trim().eq_ignore_ascii_case(title.trim()))
        .or(first_fresh)
        .or_else(|| items.first())
        .cloned()
}
