//! TaskSync - Main Library
//!
//! TaskSync is a personal todo client. Every change appears in the list
//! immediately and is reconciled with the todo backend in the background;
//! failed changes are rolled back and reported. Login and signup fall back to
//! a local credential table when the backend cannot be reached.
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic types
//!   - Todo model, ids, priorities, owner keys
//!   - Configuration values and validation
//!   - Error types
//!
//! - **`egui_app`** - Native desktop app (egui/eframe)
//!   - Backend API client
//!   - Authentication, session and preference persistence
//!   - Optimistic todo synchronizer
//!   - Views and theme
//!
//! # Usage
//!
//! ```rust,no_run
//! use tasksync::egui_app::{ApiClient, AuthFlow, Config, SqliteStore, TodoSynchronizer};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new(Config::load()?)?;
//! let store = Arc::new(SqliteStore::open_default().await?);
//! let auth = AuthFlow::new(api.clone(), store);
//!
//! let session = auth.login("alice", "secret").await?;
//! let todos = TodoSynchronizer::spawn(api, session.owner_key());
//! for todo in todos.list().await? {
//!     println!("{} {}", if todo.completed { "[x]" } else { "[ ]" }, todo.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! - **Todo list**: owned by one task per user; mutations apply one at a time
//! - **Stores**: `KeyValueStore` implementations are `Send + Sync`
//! - **Native**: egui is single-threaded immediate mode GUI; async results are
//!   polled once per frame
//!
//! # Error Handling
//!
//! Each layer has its own `thiserror` enum (`ApiError`, `AuthError`,
//! `SyncError`, `StoreError`, `ConfigError`, `SharedError`). The `Display`
//! text of `AuthError` and `SyncError` is what the user sees.

/// Shared types and data structures
pub mod shared;

/// egui native desktop app
/// Only compiled for native targets (not WASM)
#[cfg(not(target_arch = "wasm32"))]
pub mod egui_app;
