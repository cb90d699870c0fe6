//! The [`PipelineStore`] trait defining the storage contract for
//! pipelines.
//!
//! All backends (InMemoryStore, SqliteStore) implement this trait with
//! identical semantics, so they are fully swappable behind the service
//! layer. The trait is synchronous; the server wraps the store in an
//! async-aware mutex.
//!
//! # Lookup contract
//!
//! `get_pipeline` on an unknown uid returns `Ok(None)` -- absence is a
//! normal outcome, not an error. A document that exists but cannot be
//! reconstructed returns `Err(DocumentCorrupted)`. The two cases are never
//! conflated.
//!
//! # Create contract
//!
//! `create_pipeline` is idempotent by structure: when a stored pipeline
//! has the same structural hash, its uid is returned with
//! `already_existed = true` and nothing is written. Otherwise the document
//! is upserted under the caller's uid (or a freshly assigned UUIDv4).

use pipehub_core::Pipeline;

use crate::error::StorageError;
use crate::types::{CreateOutcome, PipelineSummary};

/// The storage contract for pipeline documents.
pub trait PipelineStore {
    /// Persists a pipeline, deduplicating by structural hash.
    fn create_pipeline(
        &mut self,
        uid: Option<&str>,
        pipeline: &Pipeline,
    ) -> Result<CreateOutcome, StorageError>;

    /// Loads a pipeline by uid. `Ok(None)` when no document exists.
    fn get_pipeline(&self, uid: &str) -> Result<Option<Pipeline>, StorageError>;

    /// Returns `true` if a document is stored under the uid.
    fn pipeline_exists(&self, uid: &str) -> Result<bool, StorageError>;

    /// Deletes a stored pipeline. Errors with `PipelineNotFound` when the
    /// uid is absent.
    fn delete_pipeline(&mut self, uid: &str) -> Result<(), StorageError>;

    /// Lists all stored pipelines, ordered by uid.
    fn list_pipelines(&self) -> Result<Vec<PipelineSummary>, StorageError>;

    /// Finds the uid of a stored pipeline with the same structural hash.
    fn find_by_structure(
        &self,
        pipeline: &Pipeline,
    ) -> Result<Option<String>, StorageError>;
}
