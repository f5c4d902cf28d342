//! Todo Data Model
//!
//! Canonical todo types used everywhere past the API boundary. Raw server
//! records never leave `egui_app::types`; they are normalized into
//! [`TodoItem`] on arrival.

use crate::shared::error::SharedError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of client-assigned ids for items the server has not confirmed yet
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Identifier of a todo item
///
/// `Server` ids are assigned by the backend once the item is persisted.
/// `Temp` ids (`temp-<timestamp>`) only live in the local list while a create
/// request is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Server(u64),
    Temp(String),
}

impl TodoId {
    /// Temporary id derived from a millisecond timestamp
    pub fn temporary(timestamp_millis: i64) -> Self {
        Self::Temp(format!("{}{}", TEMP_ID_PREFIX, timestamp_millis))
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temp(_))
    }

    pub fn server_id(&self) -> Option<u64> {
        match self {
            Self::Server(id) => Some(*id),
            Self::Temp(_) => None,
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => write!(f, "{}", id),
            Self::Temp(id) => f.write_str(id),
        }
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self::Server(id)
    }
}

/// Todo priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Case-insensitive parse; anything unrecognized is `Medium`
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A todo item in canonical shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    /// Owning user, when the server reports it
    pub user_id: Option<u64>,
}

impl TodoItem {
    /// Display text. Older backends called the title `text`; both map here.
    pub fn text(&self) -> &str {
        &self.title
    }

    /// Case-insensitive title match used by the list search box
    pub fn matches_query(&self, query: &str) -> bool {
        self.title
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}

/// User input for a new todo, before it has any id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Trim the fields; a blank title is rejected, a blank description is dropped
    pub fn validate(self) -> Result<Self, SharedError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(SharedError::validation("title", "Please enter a task title"));
        }
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Ok(Self {
            title,
            description,
            priority: self.priority,
        })
    }

    /// The optimistic list entry shown while the create request is in flight
    pub fn to_pending_item(&self, id: TodoId, user_id: Option<u64>) -> TodoItem {
        TodoItem {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            completed: false,
            user_id,
        }
    }
}

/// Key used to select whose todos to load
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerKey {
    /// Numeric user id, queried with `user_id=`
    Id(u64),
    /// Username or email, queried with `user=`
    Name(String),
}

impl OwnerKey {
    /// All-digit keys are numeric ids; anything else is a name
    pub fn parse(key: &str) -> Self {
        let key = key.trim();
        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = key.parse::<u64>() {
                return Self::Id(id);
            }
        }
        Self::Name(key.to_string())
    }

    /// Query parameter name and value for `GET /api/todos`
    pub fn query_pair(&self) -> (&'static str, String) {
        match self {
            Self::Id(id) => ("user_id", id.to_string()),
            Self::Name(name) => ("user", name.clone()),
        }
    }

    pub fn numeric_id(&self) -> Option<u64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Name(_) => None,
        }
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Name(name) => f.write_str(name),
        }
    }
}
