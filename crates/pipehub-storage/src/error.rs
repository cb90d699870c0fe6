//! Storage error types for pipehub-storage.
//!
//! [`StorageError`] covers the anticipated failure modes of the document
//! store: serialization, database access, migrations, missing pipelines,
//! and documents that no longer decode into a valid pipeline.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The underlying SQLite database reported an error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// No pipeline is stored under the given uid.
    ///
    /// Lookups never produce this (absence is `Ok(None)`); it is reserved
    /// for operations that require the uid to exist, such as delete.
    #[error("pipeline not found: '{0}'")]
    PipelineNotFound(String),

    /// A stored document exists but cannot be reconstructed into a
    /// pipeline. Deliberately distinct from [`PipelineNotFound`]: a corrupt
    /// document is an infrastructure fault, not an absent one.
    ///
    /// [`PipelineNotFound`]: StorageError::PipelineNotFound
    #[error("stored document for '{uid}' is corrupt: {reason}")]
    DocumentCorrupted { uid: String, reason: String },
}
