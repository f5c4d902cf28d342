//! Todo Backend API Client
//!
//! Async HTTP client for the auth, user and todo endpoints. Every call is a
//! single attempt: no retries, no backoff. Transport failures and non-2xx
//! answers are kept apart because the auth flow treats them differently.

use crate::egui_app::config::Config;
use crate::egui_app::types::{
    LoginRequest, NewTodoRequest, RawTodo, SignupRequest, UpdateTodoRequest, UserResponse,
};
use crate::shared::{OwnerKey, TodoItem};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors returned by [`ApiClient`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never completed (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered 2xx but the body was not what we expected
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Todo backend client
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    client: Client,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { config, client })
    }

    /// `POST /api/users/auth`
    pub async fn authenticate(&self, request: &LoginRequest) -> Result<UserResponse, ApiError> {
        let url = self.config.api_url("/api/users/auth");
        tracing::debug!("[API] POST {} as {}", url, request.username);

        let response = self.client.post(&url).json(request).send().await?;
        let response = ensure_success(response).await?;
        Ok(lenient_json(response).await.unwrap_or_default())
    }

    /// `POST /api/users`
    pub async fn create_user(&self, request: &SignupRequest) -> Result<UserResponse, ApiError> {
        let url = self.config.api_url("/api/users");
        tracing::debug!("[API] POST {} for {}", url, request.username);

        let response = self.client.post(&url).json(request).send().await?;
        let response = ensure_success(response).await?;
        Ok(lenient_json(response).await.unwrap_or_default())
    }

    /// `GET /api/todos?user_id=<id>` or `?user=<name>`
    ///
    /// Records without a usable id are skipped. A body that is not a JSON
    /// array yields an empty list.
    pub async fn list_todos(&self, owner: &OwnerKey) -> Result<Vec<TodoItem>, ApiError> {
        let url = self.config.api_url("/api/todos");
        let (param, value) = owner.query_pair();
        tracing::debug!("[API] GET {}?{}={}", url, param, value);

        let response = self
            .client
            .get(&url)
            .query(&[(param, value.as_str())])
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let serde_json::Value::Array(records) = body else {
            tracing::warn!("[API] Todo list response was not an array");
            return Ok(Vec::new());
        };

        let mut todos = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::from_value::<RawTodo>(record) {
                Ok(raw) => match raw.normalize() {
                    Some(item) => todos.push(item),
                    None => tracing::warn!("[API] Skipping todo record without id"),
                },
                Err(e) => tracing::warn!("[API] Skipping malformed todo record: {}", e),
            }
        }
        Ok(todos)
    }

    /// `POST /api/todos`
    ///
    /// Returns `None` when the server accepted the todo but did not echo back a
    /// record with an id.
    pub async fn create_todo(&self, request: &NewTodoRequest) -> Result<Option<TodoItem>, ApiError> {
        let url = self.config.api_url("/api/todos");
        tracing::debug!("[API] POST {} title={}", url, request.title);

        let response = self.client.post(&url).json(request).send().await?;
        let response = ensure_success(response).await?;
        Ok(lenient_json::<RawTodo>(response)
            .await
            .and_then(RawTodo::normalize))
    }

    /// `PUT /api/todos/:id` with the new completion flag
    pub async fn update_todo(&self, id: u64, completed: bool) -> Result<(), ApiError> {
        let url = self.config.api_url(&format!("/api/todos/{}", id));
        tracing::debug!("[API] PUT {} completed={}", url, completed);

        let response = self
            .client
            .put(&url)
            .json(&UpdateTodoRequest::completed(completed))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// `DELETE /api/todos/:id`
    pub async fn delete_todo(&self, id: u64) -> Result<(), ApiError> {
        let url = self.config.api_url(&format!("/api/todos/{}", id));
        tracing::debug!("[API] DELETE {}", url);

        let response = self.client.delete(&url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| status.to_string());
    tracing::warn!("[API] Request failed with {}: {}", status, body);
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Parse a success body, treating an empty or non-JSON body as absent
async fn lenient_json<T: DeserializeOwned>(response: Response) -> Option<T> {
    let text = response.text().await.ok()?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("[API] Ignoring unparsable response body: {}", e);
            None
        }
    }
}
