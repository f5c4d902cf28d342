//! Optimistic todo synchronization against a mocked backend

use crate::common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use tasksync::egui_app::todos::{ListSnapshot, ListState, MutationKind, SyncError, TodoSynchronizer};
use tasksync::shared::{OwnerKey, Priority, TodoDraft, TodoId, TodoItem};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn item(id: u64, title: &str, completed: bool) -> TodoItem {
    TodoItem {
        id: TodoId::Server(id),
        title: title.to_string(),
        description: None,
        priority: Priority::Medium,
        completed,
        user_id: Some(42),
    }
}

async fn mount_list(server: &MockServer, records: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .and(query_param("user_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records))
        .mount(server)
        .await;
}

/// Synchronizer for user 42 with `A` (open) and `B` (done) already loaded
async fn loaded(server: &MockServer) -> TodoSynchronizer {
    mount_list(
        server,
        json!([todo_record(1, "A", false), todo_record(2, "B", true)]),
    )
    .await;
    let todos = TodoSynchronizer::spawn(api_for(server), OwnerKey::Id(42));
    assert_ok!(todos.list().await);
    todos
}

/// Wait until the published snapshot satisfies `predicate` and return a copy
async fn wait_for_snapshot(
    todos: &TodoSynchronizer,
    predicate: impl FnMut(&ListSnapshot) -> bool,
) -> ListSnapshot {
    let mut rx = todos.watch();
    let snapshot = tokio::time::timeout(WAIT, rx.wait_for(predicate))
        .await
        .expect("snapshot in time")
        .expect("synchronizer running");
    ListSnapshot::clone(&snapshot)
}

#[tokio::test]
async fn test_list_normalizes_records() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        json!([
            {"id": 1, "title": "A", "is_completed": 1},
            {"id": "2", "text": "B", "completed": true, "priority": "HIGH"},
            {"title": "no id"},
            "garbage",
        ]),
    )
    .await;

    let todos = TodoSynchronizer::spawn(api_for(&server), OwnerKey::Id(42));
    let items = assert_ok!(todos.list().await);

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, TodoId::Server(1));
    assert_eq!(items[0].title, "A");
    assert!(items[0].completed);
    assert_eq!(items[0].priority, Priority::Medium);
    assert_eq!(items[1].id, TodoId::Server(2));
    assert_eq!(items[1].text(), "B");
    assert!(items[1].completed);
    assert_eq!(items[1].priority, Priority::High);
}

#[tokio::test]
async fn test_list_by_name_and_non_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .and(query_param("user", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "nope"})))
        .expect(1)
        .mount(&server)
        .await;

    let todos = TodoSynchronizer::spawn(api_for(&server), OwnerKey::parse("alice"));
    let items = assert_ok!(todos.list().await);
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_list_failure_keeps_current_items() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = todos.list().await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "Could not load todos from server: Server returned 503: maintenance"
    );
    assert_eq!(todos.snapshot().items, vec![item(1, "A", false), item(2, "B", true)]);
}

#[tokio::test]
async fn test_create_is_visible_before_server_answers() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .and(body_json(json!({
            "title": "Buy milk",
            "description": null,
            "priority": "medium",
            "user_id": 42,
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(todo_record(7, "Buy milk", false))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handle = tokio::spawn({
        let todos = todos.clone();
        async move { todos.create(TodoDraft::new("  Buy milk ")).await }
    });

    let pending = wait_for_snapshot(&todos, |s| {
        matches!(s.state, ListState::PendingCreate { .. })
    })
    .await;
    assert_eq!(pending.items.len(), 3);
    assert!(pending.items[0].id.is_temporary());
    assert_eq!(pending.items[0].title, "Buy milk");
    assert!(!pending.items[0].completed);

    let created = assert_ok!(handle.await.expect("create task"));
    assert_eq!(created, item(7, "Buy milk", false));

    let snapshot = todos.snapshot();
    assert!(snapshot.state.is_synced());
    assert_eq!(
        snapshot.items,
        vec![item(7, "Buy milk", false), item(1, "A", false), item(2, "B", true)]
    );
    assert!(snapshot.items.iter().all(|i| !i.id.is_temporary()));
}

#[tokio::test]
async fn test_create_failure_restores_list() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    let before = todos.snapshot().items;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut events = todos.subscribe();
    let err = todos.create(TodoDraft::new("Buy milk")).await.unwrap_err();

    assert_eq!(err.user_message(), "Could not add todo");
    assert!(err.is_rolled_back());
    assert_eq!(todos.snapshot().items, before);

    let event = assert_ok!(events.recv().await);
    assert!(event.is_rollback());
    assert_eq!(event.kind(), MutationKind::Create);
}

#[tokio::test]
async fn test_create_without_echo_refetches() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_string("Created"))
        .mount(&server)
        .await;
    mount_list(
        &server,
        json!([
            todo_record(1, "A", false),
            todo_record(2, "B", true),
            todo_record(9, "Buy milk", false),
        ]),
    )
    .await;

    let created = assert_ok!(todos.create(TodoDraft::new("Buy milk")).await);
    assert_eq!(created.id, TodoId::Server(9));
    assert_eq!(todos.snapshot().items.len(), 3);
    assert!(todos.snapshot().items.iter().all(|i| !i.id.is_temporary()));
}

/// The server stores the title in its own casing and sends no id back.
#[tokio::test]
async fn test_create_without_echo_succeeds_with_refetched_item() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    mount_list(
        &server,
        json!([
            todo_record(1, "A", false),
            todo_record(2, "B", true),
            todo_record(9, "buy milk", false),
        ]),
    )
    .await;

    let mut events = todos.subscribe();
    let created = assert_ok!(todos.create(TodoDraft::new("Buy milk")).await);
    assert_eq!(created, item(9, "buy milk", false));

    let event = assert_ok!(events.recv().await);
    assert!(!event.is_rollback());
    assert_eq!(event.kind(), MutationKind::Create);
    assert_eq!(
        todos.snapshot().items.iter().map(|i| i.id.clone()).collect::<Vec<_>>(),
        vec![TodoId::Server(1), TodoId::Server(2), TodoId::Server(9)]
    );
}

#[tokio::test]
async fn test_create_without_echo_rolls_back_when_refetch_fails() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    let before = todos.snapshot().items;
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let mut events = todos.subscribe();
    let err = todos.create(TodoDraft::new("Buy milk")).await.unwrap_err();

    assert_eq!(err.user_message(), "Could not add todo");
    assert!(err.is_rolled_back());
    assert_eq!(todos.snapshot().items, before);
    assert!(todos.snapshot().state.is_synced());

    let event = assert_ok!(events.recv().await);
    assert!(event.is_rollback());
}

#[tokio::test]
async fn test_create_for_name_owner_omits_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .and(body_json(json!({
            "title": "Walk dog",
            "description": "before dinner",
            "priority": "high",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3, "title": "Walk dog"})))
        .expect(1)
        .mount(&server)
        .await;

    let todos = TodoSynchronizer::spawn(api_for(&server), OwnerKey::parse("alice"));
    let draft = TodoDraft::new("Walk dog")
        .with_description("before dinner")
        .with_priority(Priority::High);
    let created = assert_ok!(todos.create(draft).await);
    assert_eq!(created.id, TodoId::Server(3));
}

#[tokio::test]
async fn test_toggle_sends_flag_and_keeps_change() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/todos/1"))
        .and(body_json(json!({"is_completed": 1})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let completed = assert_ok!(todos.toggle(TodoId::Server(1)).await);
    assert!(completed);
    assert_eq!(todos.snapshot().items, vec![item(1, "A", true), item(2, "B", true)]);
}

#[tokio::test]
async fn test_toggle_failure_restores_exact_list() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    let before = todos.snapshot().items;
    Mock::given(method("PUT"))
        .and(path("/api/todos/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = todos.toggle(TodoId::Server(2)).await.unwrap_err();
    assert_eq!(err.user_message(), "Could not update todo");
    assert_eq!(todos.snapshot().items, before);
}

#[tokio::test]
async fn test_delete_success_and_failure() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/todos/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/todos/2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = todos.delete(TodoId::Server(1)).await.unwrap_err();
    assert_eq!(err.user_message(), "Could not delete todo");
    assert_eq!(todos.snapshot().items, vec![item(1, "A", false), item(2, "B", true)]);

    assert_ok!(todos.delete(TodoId::Server(2)).await);
    assert_eq!(todos.snapshot().items, vec![item(1, "A", false)]);
}

#[tokio::test]
async fn test_unknown_id_makes_no_request() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = todos.toggle(TodoId::Server(99)).await;
    assert_err!(result, SyncError::NotFound(_));
}

/// A slow failing toggle followed by a delete must not undo the delete.
#[tokio::test]
async fn test_rollback_does_not_undo_later_mutation() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/todos/1"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/todos/2"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let (toggle, delete) = tokio::join!(
        todos.toggle(TodoId::Server(1)),
        todos.delete(TodoId::Server(2)),
    );

    assert_err!(toggle, SyncError::Toggle(_));
    assert_ok!(delete);
    assert_eq!(todos.snapshot().items, vec![item(1, "A", false)]);
}

#[tokio::test]
async fn test_successful_mutations_match_server_listing() {
    let server = MockServer::start().await;
    let todos = loaded(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(todo_record(3, "C", false)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/todos/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/todos/2"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert_ok!(todos.create(TodoDraft::new("C")).await);
    assert_ok!(todos.toggle(TodoId::Server(1)).await);
    assert_ok!(todos.delete(TodoId::Server(2)).await);
    let local = todos.snapshot().items;

    // The server now reports the same state in the same order.
    server.reset().await;
    mount_list(
        &server,
        json!([todo_record(3, "C", false), todo_record(1, "A", true)]),
    )
    .await;
    let remote = assert_ok!(todos.list().await);

    assert_eq!(local, remote);
}
