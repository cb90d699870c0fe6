//! Core error types for pipehub-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! the failure modes of the pipeline graph model.

use crate::id::NodeId;
use thiserror::Error;

/// Core errors produced by the pipehub-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A node index was not found in the pipeline.
    #[error("node not found: NodeId({id})", id = id.0)]
    NodeNotFound { id: NodeId },

    /// A dependency edge failed validation.
    #[error("invalid dependency: {reason}")]
    InvalidDependency { reason: String },

    /// A task type name was not recognized.
    #[error("unknown task type: '{name}'")]
    UnknownTask { name: String },
}
