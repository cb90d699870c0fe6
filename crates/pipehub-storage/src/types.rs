//! Storage-layer types for pipeline identity and metadata.
//!
//! Uids live here (not in pipehub-core) because persistent identity is a
//! storage concern -- a pipeline only gains a uid when persisted.

use serde::{Deserialize, Serialize};

/// Outcome of a create/persist call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOutcome {
    /// Uid the pipeline is stored under. When a structurally identical
    /// pipeline was already present, this is the existing uid.
    pub uid: String,
    /// `true` iff a structurally identical pipeline was already stored
    /// (nothing was written in that case).
    pub already_existed: bool,
}

/// Summary of a stored pipeline (for listing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub uid: String,
    /// Number of operator nodes in the stored document.
    pub node_count: usize,
    /// Hex-encoded structural hash.
    pub structural_hash: String,
}
