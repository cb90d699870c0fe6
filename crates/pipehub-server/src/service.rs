//! The service facade binding codec, validator and store together.
//!
//! [`PipelineService`] owns the storage backend behind the
//! [`PipelineStore`] trait -- constructed explicitly and injected through
//! [`AppState`](crate::state::AppState), never reached through a global.
//! Methods return `Result<_, ApiError>` so handlers stay one-liners.

use pipehub_check::{validate_pipeline, verdict, ValidationVerdict};
use pipehub_core::describe::{pipeline_from_descriptor, pipeline_to_descriptor};
use pipehub_core::PipelineDescriptor;
use pipehub_storage::{
    CreateOutcome, InMemoryStore, PipelineStore, PipelineSummary, SqliteStore,
};

use crate::error::ApiError;

/// Application service for pipeline operations.
pub struct PipelineService {
    store: Box<dyn PipelineStore + Send>,
}

impl PipelineService {
    /// Creates a service backed by a SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        Ok(PipelineService {
            store: Box::new(SqliteStore::new(db_path)?),
        })
    }

    /// Creates a service backed by the in-memory store (for testing).
    pub fn in_memory() -> Self {
        PipelineService {
            store: Box::new(InMemoryStore::new()),
        }
    }

    /// Creates a service over an explicit store handle.
    pub fn with_store(store: Box<dyn PipelineStore + Send>) -> Self {
        PipelineService { store }
    }

    /// Fetches a stored pipeline as its wire descriptor.
    ///
    /// Node params are stripped: the graph endpoint serves structure, not
    /// hyperparameters. Absent uids are a 404, never an empty body.
    pub fn graph_by_uid(&self, uid: &str) -> Result<PipelineDescriptor, ApiError> {
        let pipeline = self
            .store
            .get_pipeline(uid)?
            .ok_or_else(|| ApiError::NotFound(format!("pipeline not found: '{uid}'")))?;

        let mut descriptor = pipeline_to_descriptor(&pipeline);
        descriptor.uid = Some(uid.to_string());
        for node in &mut descriptor.nodes {
            node.params.clear();
        }
        Ok(descriptor)
    }

    /// Converts and validates a descriptor, returning the normalized
    /// verdict. Conversion failures propagate as 400-class errors; only
    /// genuine structural verdicts come back as `is_valid = false`.
    pub fn validate(&self, descriptor: &PipelineDescriptor) -> Result<ValidationVerdict, ApiError> {
        let pipeline = pipeline_from_descriptor(descriptor)?;
        Ok(verdict(&pipeline))
    }

    /// Converts, validates and persists a descriptor.
    ///
    /// Structurally invalid pipelines are rejected with diagnostics and
    /// never reach the store.
    pub fn add(&mut self, descriptor: &PipelineDescriptor) -> Result<CreateOutcome, ApiError> {
        let pipeline = pipeline_from_descriptor(descriptor)?;
        let errors = validate_pipeline(&pipeline);
        if !errors.is_empty() {
            return Err(ApiError::ValidationFailed(errors));
        }
        Ok(self
            .store
            .create_pipeline(descriptor.uid.as_deref(), &pipeline)?)
    }

    /// Derives the rendered-image URL for a stored pipeline.
    pub fn image_url(&self, uid: &str) -> Result<String, ApiError> {
        if !self.store.pipeline_exists(uid)? {
            return Err(ApiError::NotFound(format!("pipeline not found: '{uid}'")));
        }
        Ok(format!("/static/pipelines/{uid}.png"))
    }

    /// Lists all stored pipelines.
    pub fn list(&self) -> Result<Vec<PipelineSummary>, ApiError> {
        Ok(self.store.list_pipelines()?)
    }

    /// Deletes a stored pipeline.
    pub fn delete(&mut self, uid: &str) -> Result<(), ApiError> {
        Ok(self.store.delete_pipeline(uid)?)
    }
}
