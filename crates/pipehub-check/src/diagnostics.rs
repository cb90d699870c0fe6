//! Structural diagnostics with context fields, and the normalized verdict.
//!
//! [`ValidationError`] captures enough context for a client to locate the
//! offending node without re-querying the pipeline. All variants serialize
//! to JSON for API transport.

use pipehub_core::NodeId;
use serde::{Deserialize, Serialize};

/// A structural violation detected during pipeline validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// The pipeline has no nodes at all.
    #[error("pipeline has no nodes")]
    EmptyPipeline,

    /// The dependency graph contains a cycle.
    #[error("pipeline contains a dependency cycle")]
    CycleDetected,

    /// No node qualifies as the root (every node has a consumer).
    #[error("pipeline has no root node")]
    NoRoot,

    /// More than one node has no consumer.
    #[error("pipeline has {count} sink nodes, expected exactly one")]
    MultipleRoots {
        count: usize,
        /// The competing sink nodes.
        sinks: Vec<NodeId>,
    },

    /// A node is connected to nothing while the pipeline has other nodes.
    #[error("node {node} ('{operation}') is isolated")]
    IsolatedNode { node: NodeId, operation: String },

    /// A node references an operation missing from the catalog.
    #[error("node {node} uses unknown operation '{operation}'")]
    UnknownOperation { node: NodeId, operation: String },

    /// The pipeline's final operator transforms features instead of
    /// predicting.
    #[error("final operation '{operation}' is not a model")]
    FinalOperationNotModel { node: NodeId, operation: String },
}

/// Normalized validation outcome: a boolean plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationVerdict {
    /// The verdict for a structurally correct pipeline.
    pub fn correct() -> Self {
        ValidationVerdict {
            is_valid: true,
            message: "Correct pipeline".to_string(),
        }
    }

    /// Builds the failure verdict from collected diagnostics, joining
    /// their messages with `"; "`.
    pub fn from_errors(errors: &[ValidationError]) -> Self {
        ValidationVerdict {
            is_valid: false,
            message: errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}
