//! Mock todo backend for integration tests

use serde_json::{json, Value};
use std::sync::Arc;
use tasksync::egui_app::{ApiClient, AuthFlow, Config, KeyValueStore, MemoryStore};
use tasksync::shared::AppConfigBuilder;
use wiremock::MockServer;

/// Client pointed at `base_url`
pub fn api_for_url(base_url: &str) -> ApiClient {
    let builder = AppConfigBuilder::default()
        .server_url(base_url.to_string())
        .request_timeout_secs(5);
    let config = Config::with_builder(builder).expect("valid test config");
    ApiClient::new(config).expect("HTTP client")
}

/// Client pointed at a running mock backend
pub fn api_for(server: &MockServer) -> ApiClient {
    api_for_url(&server.uri())
}

/// Client whose requests fail with a connection error
pub fn unreachable_api() -> ApiClient {
    api_for_url("http://127.0.0.1:1")
}

/// Auth flow over `api` with a fresh in-memory store
pub fn auth_flow(api: ApiClient) -> (Arc<MemoryStore>, AuthFlow) {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn KeyValueStore> = store.clone();
    (store, AuthFlow::new(api, shared))
}

/// A todo record the way the backend sends it
pub fn todo_record(id: u64, title: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "priority": "medium",
        "is_completed": if completed { 1 } else { 0 },
        "user_id": 42,
    })
}
