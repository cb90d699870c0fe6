//! Individual structural rules. Each rule appends its violations to the
//! shared diagnostic list; none of them short-circuits.

use pipehub_core::{operations, Pipeline};

use crate::diagnostics::ValidationError;

/// Rejects the empty pipeline.
pub fn non_empty(pipeline: &Pipeline, errors: &mut Vec<ValidationError>) {
    if pipeline.is_empty() {
        errors.push(ValidationError::EmptyPipeline);
    }
}

/// Rejects dependency cycles.
pub fn acyclic(pipeline: &Pipeline, errors: &mut Vec<ValidationError>) {
    if pipeline.has_cycle() {
        errors.push(ValidationError::CycleDetected);
    }
}

/// Requires exactly one sink — the pipeline's root.
pub fn single_root(pipeline: &Pipeline, errors: &mut Vec<ValidationError>) {
    let sinks = pipeline.sinks();
    match sinks.len() {
        0 => errors.push(ValidationError::NoRoot),
        1 => {}
        count => errors.push(ValidationError::MultipleRoots { count, sinks }),
    }
}

/// Rejects nodes connected to nothing (only meaningful once the pipeline
/// has more than one node).
pub fn no_isolated_nodes(pipeline: &Pipeline, errors: &mut Vec<ValidationError>) {
    if pipeline.node_count() < 2 {
        return;
    }
    for (id, node) in pipeline.nodes() {
        if pipeline.parents(id).is_empty() && pipeline.children(id).is_empty() {
            errors.push(ValidationError::IsolatedNode {
                node: id,
                operation: node.operation.clone(),
            });
        }
    }
}

/// Every node's operation must exist in the catalog.
pub fn known_operations(pipeline: &Pipeline, errors: &mut Vec<ValidationError>) {
    for (id, node) in pipeline.nodes() {
        if !operations::is_known(&node.operation) {
            errors.push(ValidationError::UnknownOperation {
                node: id,
                operation: node.operation.clone(),
            });
        }
    }
}

/// The root operator must predict, not transform. Skipped when the root is
/// ambiguous or its operation is already reported as unknown.
pub fn final_operation_is_model(pipeline: &Pipeline, errors: &mut Vec<ValidationError>) {
    let Some(root) = pipeline.root_node() else {
        return;
    };
    let Some(node) = pipeline.node(root) else {
        return;
    };
    if operations::is_known(&node.operation) && !operations::is_model(&node.operation) {
        errors.push(ValidationError::FinalOperationNotModel {
            node: root,
            operation: node.operation.clone(),
        });
    }
}
