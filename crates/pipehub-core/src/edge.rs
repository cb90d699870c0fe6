//! Dependency edge weights for the pipeline graph.

use serde::{Deserialize, Serialize};

/// A dependency edge from a parent operator to the child that consumes
/// its output.
///
/// `input_index` fixes the position of the parent among the child's
/// inputs, giving every node a stable, explicit parent order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Position of this parent among the child's inputs.
    pub input_index: u16,
}

impl DependencyEdge {
    /// Creates a dependency edge at the given input position.
    pub fn new(input_index: u16) -> Self {
        DependencyEdge { input_index }
    }
}
