//! Operator node weights for the pipeline graph.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single ML operator in a pipeline.
///
/// Whether a node is primary (no inputs) or secondary (consumes the output
/// of parent nodes) is derived from the graph structure, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorNode {
    /// Operation identifier, e.g. `"xgboost"` or `"scaling"`.
    pub operation: String,
    /// Operator hyperparameters. Insertion-ordered so serialized output
    /// is stable.
    #[serde(default)]
    pub params: IndexMap<String, serde_json::Value>,
}

impl OperatorNode {
    /// Creates an operator node with default (empty) parameters.
    pub fn new(operation: impl Into<String>) -> Self {
        OperatorNode {
            operation: operation.into(),
            params: IndexMap::new(),
        }
    }

    /// Creates an operator node with explicit parameters.
    pub fn with_params(
        operation: impl Into<String>,
        params: IndexMap<String, serde_json::Value>,
    ) -> Self {
        OperatorNode {
            operation: operation.into(),
            params,
        }
    }
}
