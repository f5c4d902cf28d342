/**
 * Shared Types Module
 *
 * App view states and the wire types exchanged with the todo backend.
 * Raw server records are normalized into `shared::TodoItem` here and do not
 * travel any further.
 */

use crate::shared::{Priority, TodoId, TodoItem};
use serde::{Deserialize, Serialize};

/// Current app view/mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    /// Login/signup screen
    Auth,
    /// Todo list for the signed-in user
    Todos,
    /// Profile and preferences
    Profile,
}

/// Body of `POST /api/users/auth`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/users`
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

/// Id as sent by the backend: usually a number, sometimes a numeric string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(u64),
    Text(String),
}

impl WireId {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(id) => Some(*id),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Non-empty string form, used as the session user id
    pub fn as_user_id(&self) -> Option<String> {
        match self {
            Self::Number(id) => Some(id.to_string()),
            Self::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }
}

/// Response of the auth and user-creation endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserResponse {
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Completion flag in any of the encodings the backend has used
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireFlag {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl WireFlag {
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Number(value) => *value != 0,
            Self::Text(value) => {
                let value = value.trim();
                value.eq_ignore_ascii_case("true") || value.parse::<i64>().is_ok_and(|n| n != 0)
            }
        }
    }
}

/// A todo record exactly as the server sends it
///
/// Field names are inconsistent between backend versions
/// (`is_completed`/`completed`, `title`/`text`), so everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTodo {
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub is_completed: Option<WireFlag>,
    #[serde(default)]
    pub completed: Option<WireFlag>,
    #[serde(default)]
    pub user_id: Option<WireId>,
}

impl RawTodo {
    /// Canonical item, or `None` when the record carries no usable server id
    pub fn normalize(self) -> Option<TodoItem> {
        let id = self.id.as_ref().and_then(WireId::as_u64)?;
        let title = self
            .title
            .filter(|t| !t.is_empty())
            .or(self.text)
            .unwrap_or_default();
        let completed = self.is_completed.as_ref().is_some_and(WireFlag::is_set)
            || self.completed.as_ref().is_some_and(WireFlag::is_set);
        let priority = self
            .priority
            .as_deref()
            .map(Priority::parse_lenient)
            .unwrap_or_default();

        Some(TodoItem {
            id: TodoId::Server(id),
            title,
            description: self.description.filter(|d| !d.is_empty()),
            priority,
            completed,
            user_id: self.user_id.as_ref().and_then(WireId::as_u64),
        })
    }
}

/// Body of `POST /api/todos`
#[derive(Debug, Clone, Serialize)]
pub struct NewTodoRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

/// Body of `PUT /api/todos/:id`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateTodoRequest {
    pub is_completed: u8,
}

impl UpdateTodoRequest {
    pub fn completed(completed: bool) -> Self {
        Self {
            is_completed: u8::from(completed),
        }
    }
}
