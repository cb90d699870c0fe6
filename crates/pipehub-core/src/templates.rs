//! Template pipelines used as composer seeds and showcase fixtures.
//!
//! Each task type has a small baseline pipeline; classification also has
//! the two-level ensemble used throughout the test suite:
//!
//! ```text
//!        xgboost
//!       /       \
//!   xgboost     knn
//!   /    \     /   \
//! logit  lda logit lda
//! ```

use crate::node::OperatorNode;
use crate::operations::TaskType;
use crate::pipeline::Pipeline;

/// Two-level classification ensemble: a boosted-tree root over two
/// secondary models, each fed by its own logit and lda primaries.
pub fn two_level_ensemble() -> Pipeline {
    let mut pipeline = Pipeline::new();
    let root = pipeline.add_node(OperatorNode::new("xgboost"));

    for (slot, mid_operation) in ["xgboost", "knn"].into_iter().enumerate() {
        let mid = pipeline.add_node(OperatorNode::new(mid_operation));
        for (parent_slot, primary_operation) in ["logit", "lda"].into_iter().enumerate() {
            let primary = pipeline.add_node(OperatorNode::new(primary_operation));
            pipeline
                .add_dependency(primary, mid, parent_slot as u16)
                .expect("template wiring is static");
        }
        pipeline
            .add_dependency(mid, root, slot as u16)
            .expect("template wiring is static");
    }

    pipeline
}

/// Minimal classification pipeline: scaling into a boosted tree.
pub fn classification_baseline() -> Pipeline {
    linear(&["scaling", "xgboost"])
}

/// Minimal regression pipeline: scaling into ridge.
pub fn regression_baseline() -> Pipeline {
    linear(&["scaling", "ridge"])
}

/// Minimal forecasting pipeline: lagged transform into an autoregression.
pub fn ts_forecasting_baseline() -> Pipeline {
    linear(&["lagged", "ar"])
}

/// The baseline template for a task.
pub fn template_for_task(task: TaskType) -> Pipeline {
    match task {
        TaskType::Classification => classification_baseline(),
        TaskType::Regression => regression_baseline(),
        TaskType::TsForecasting => ts_forecasting_baseline(),
    }
}

/// Chains operations left to right: each node is the single parent of the
/// next.
fn linear(operations: &[&str]) -> Pipeline {
    let mut pipeline = Pipeline::new();
    let mut previous = None;
    for operation in operations {
        let node = pipeline.add_node(OperatorNode::new(*operation));
        if let Some(parent) = previous {
            pipeline
                .add_dependency(parent, node, 0)
                .expect("template wiring is static");
        }
        previous = Some(node);
    }
    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations;

    #[test]
    fn two_level_ensemble_shape() {
        let pipeline = two_level_ensemble();
        assert_eq!(pipeline.node_count(), 7);
        assert_eq!(pipeline.edge_count(), 6);
        assert_eq!(pipeline.depth(), Some(3));

        let root = pipeline.root_node().unwrap();
        assert_eq!(pipeline.node(root).unwrap().operation, "xgboost");

        let mids = pipeline.parents(root);
        assert_eq!(mids.len(), 2);
        assert_eq!(pipeline.node(mids[0]).unwrap().operation, "xgboost");
        assert_eq!(pipeline.node(mids[1]).unwrap().operation, "knn");
        for mid in mids {
            let primaries = pipeline.parents(mid);
            assert_eq!(primaries.len(), 2);
            assert!(primaries.iter().all(|&p| pipeline.is_primary(p)));
        }
    }

    #[test]
    fn baselines_end_in_task_models() {
        for task in TaskType::ALL {
            let pipeline = template_for_task(task);
            let root = pipeline.root_node().unwrap();
            let operation = &pipeline.node(root).unwrap().operation;
            assert!(operations::is_model(operation));
            assert!(operations::models_for(task).contains(&operation.as_str()));
        }
    }
}
