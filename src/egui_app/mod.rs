//! egui Native Desktop App Module
//!
//! Todo client with optimistic sync against the todo backend and an offline
//! fallback for authentication.
//!
//! # Architecture
//!
//! The egui_app module is organized into focused submodules:
//!
//! - **`config`** - Backend URL and request timeout resolution
//! - **`types`** - App view enum and backend wire types
//! - **`api_client`** - HTTP client for the auth, user and todo endpoints
//! - **`local_store`** - Key/value persistence (SQLite, or memory in tests)
//! - **`session`** - Stored session resolution and persistence
//! - **`auth`** - Remote-first login and signup with an offline credential table
//! - **`todos`** - Optimistic todo list synchronizer
//! - **`preferences`** - Dark mode and profile image
//! - **`state`**, **`views`**, **`theme`** - The egui shell
//!
//! # Module Structure
//!
//! ```text
//! egui_app/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Main application entry point
//! ├── config.rs       - Configuration management
//! ├── types.rs        - Shared and wire types
//! ├── api_client.rs   - Todo backend client
//! ├── auth.rs         - Authentication flow
//! ├── session.rs      - Session manager
//! ├── preferences.rs  - UI preferences
//! ├── local_store/    - Key/value store
//! ├── todos/          - Todo synchronizer
//! ├── state/          - egui app state
//! ├── views/          - egui views
//! └── theme/          - Palettes and frames
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! // Run the egui app:
//! // cargo run --bin egui_app
//! ```

pub mod config;
pub mod types;
pub mod api_client;
pub mod local_store;
pub mod session;
pub mod auth;
pub mod todos;
pub mod preferences;
pub mod state;
pub mod views;
pub mod theme;

// Re-export commonly used types
pub use config::Config;
pub use api_client::{ApiClient, ApiError};
pub use auth::{AuthError, AuthFlow, AuthState, Connectivity, CredentialStore, LocalStore, RemoteStore};
pub use local_store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use preferences::Preferences;
pub use session::{Session, SessionManager};
pub use state::AppState;
pub use todos::{ListSnapshot, ListState, SyncError, SyncEvent, TodoSynchronizer};
pub use types::AppView;
