//! Application state with the shared `PipelineService`.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use
//! with axum handlers. The async-aware mutex lets handlers await the lock
//! without blocking the tokio runtime. An `RwLock` would allow concurrent
//! reads, but the SQLite backend's `rusqlite::Connection` is `!Sync`, so a
//! mutex it is -- each request holds it only for a single store call.

use std::sync::Arc;

use crate::error::ApiError;
use crate::service::PipelineService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared pipeline service (async mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<PipelineService>>,
}

impl AppState {
    /// Creates an `AppState` backed by the SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(PipelineService::new(db_path)?)),
        })
    }

    /// Creates an `AppState` with the in-memory store (for testing).
    pub fn in_memory() -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(PipelineService::in_memory())),
        }
    }
}
