//! The wire-format descriptor and the codec between descriptors and
//! [`Pipeline`] graphs.
//!
//! [`PipelineDescriptor`] is the external JSON representation: a flat node
//! list with DAG structure implied by `parent_ids`. The codec is pure in
//! both directions:
//! - [`pipeline_from_descriptor`] constructs primary nodes first, then
//!   secondary nodes in an order that guarantees every node is built only
//!   after all its declared parents exist.
//! - [`pipeline_to_descriptor`] walks nodes in stable index order and
//!   translates parent references back to ids. Ids are remapped to
//!   synthetic `<operation>_<position>` names; the result is deterministic
//!   for a given pipeline.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::NodeId;
use crate::node::OperatorNode;
use crate::pipeline::Pipeline;

/// One operator in the wire representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Node id, unique within the descriptor.
    pub id: String,
    /// Operation identifier, e.g. `"xgboost"`.
    pub operation: String,
    /// Operator hyperparameters.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, serde_json::Value>,
    /// Ids of parent nodes, in input order. Empty for primary nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_ids: Vec<String>,
}

/// External wire representation of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDescriptor {
    /// Storage uid, when the pipeline is (to be) persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub nodes: Vec<NodeDescriptor>,
}

/// Conversion failures for malformed descriptors.
#[derive(Debug, Error)]
pub enum DescribeError {
    /// Two nodes in the descriptor share an id.
    #[error("duplicate node id: '{id}'")]
    DuplicateNodeId { id: String },

    /// A node references a parent id that does not exist in the descriptor.
    #[error("node '{node}' references unknown parent '{parent}'")]
    UnknownParent { node: String, parent: String },

    /// A node lists itself among its parents.
    #[error("node '{id}' depends on itself")]
    SelfDependency { id: String },

    /// The parent references form a cycle; the listed nodes could not be
    /// constructed.
    #[error("cyclic dependency among nodes: {nodes:?}")]
    CycleDetected { nodes: Vec<String> },

    /// A node's parent list is locally invalid (e.g. the same parent twice).
    #[error("invalid dependency for node '{node}': {reason}")]
    InvalidDependency { node: String, reason: String },
}

/// Builds a [`Pipeline`] from a descriptor.
///
/// Nodes are constructed in topological order over `parent_ids`: each pass
/// builds every node whose parents all exist, so primary nodes come first
/// and a node is never built before its parents. A pass that makes no
/// progress means the remaining nodes form a cycle.
pub fn pipeline_from_descriptor(
    desc: &PipelineDescriptor,
) -> Result<Pipeline, DescribeError> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(desc.nodes.len());
    for node in &desc.nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(DescribeError::DuplicateNodeId {
                id: node.id.clone(),
            });
        }
    }
    for node in &desc.nodes {
        for parent in &node.parent_ids {
            if parent == &node.id {
                return Err(DescribeError::SelfDependency {
                    id: node.id.clone(),
                });
            }
            if !ids.contains(parent.as_str()) {
                return Err(DescribeError::UnknownParent {
                    node: node.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    let mut pipeline = Pipeline::new();
    let mut constructed: HashMap<&str, NodeId> = HashMap::with_capacity(desc.nodes.len());
    let mut pending: Vec<&NodeDescriptor> = desc.nodes.iter().collect();

    while !pending.is_empty() {
        let mut remaining = Vec::new();
        let mut progressed = false;

        for node in pending {
            let ready = node
                .parent_ids
                .iter()
                .all(|p| constructed.contains_key(p.as_str()));
            if !ready {
                remaining.push(node);
                continue;
            }

            let node_id = pipeline.add_node(OperatorNode::with_params(
                node.operation.clone(),
                node.params.clone(),
            ));
            for (slot, parent) in node.parent_ids.iter().enumerate() {
                let parent_id = constructed[parent.as_str()];
                pipeline
                    .add_dependency(parent_id, node_id, slot as u16)
                    .map_err(|e| DescribeError::InvalidDependency {
                        node: node.id.clone(),
                        reason: e.to_string(),
                    })?;
            }
            constructed.insert(node.id.as_str(), node_id);
            progressed = true;
        }

        if !progressed {
            let mut nodes: Vec<String> =
                remaining.iter().map(|n| n.id.clone()).collect();
            nodes.sort();
            return Err(DescribeError::CycleDetected { nodes });
        }
        pending = remaining;
    }

    Ok(pipeline)
}

/// Emits the wire representation of a pipeline.
///
/// Node ids are remapped to `<operation>_<position>` with positions taken
/// from stable node order, so output is deterministic. The `uid` field is
/// left unset; callers attach it when responding from storage.
pub fn pipeline_to_descriptor(pipeline: &Pipeline) -> PipelineDescriptor {
    let mut ids: HashMap<NodeId, String> = HashMap::with_capacity(pipeline.node_count());
    for (pos, (node_id, node)) in pipeline.nodes().enumerate() {
        ids.insert(node_id, format!("{}_{}", node.operation, pos));
    }

    let nodes = pipeline
        .nodes()
        .map(|(node_id, node)| NodeDescriptor {
            id: ids[&node_id].clone(),
            operation: node.operation.clone(),
            params: node.params.clone(),
            parent_ids: pipeline
                .parents(node_id)
                .iter()
                .map(|p| ids[p].clone())
                .collect(),
        })
        .collect();

    PipelineDescriptor { uid: None, nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn node(id: &str, operation: &str, parents: &[&str]) -> NodeDescriptor {
        NodeDescriptor {
            id: id.to_string(),
            operation: operation.to_string(),
            params: IndexMap::new(),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The ensemble from the wire-format docs: two primaries feeding one
    /// boosted-tree root.
    fn ensemble_descriptor() -> PipelineDescriptor {
        PipelineDescriptor {
            uid: Some("c1".to_string()),
            nodes: vec![
                node("n1", "logit", &[]),
                node("n2", "lda", &[]),
                node("n3", "xgboost", &["n1", "n2"]),
            ],
        }
    }

    #[test]
    fn converts_ensemble_descriptor() {
        let pipeline = pipeline_from_descriptor(&ensemble_descriptor()).unwrap();
        assert_eq!(pipeline.node_count(), 3);
        assert_eq!(pipeline.edge_count(), 2);

        let root = pipeline.root_node().unwrap();
        assert_eq!(pipeline.node(root).unwrap().operation, "xgboost");
        assert!(!pipeline.is_primary(root));

        let parents = pipeline.parents(root);
        assert_eq!(parents.len(), 2);
        assert_eq!(pipeline.node(parents[0]).unwrap().operation, "logit");
        assert_eq!(pipeline.node(parents[1]).unwrap().operation, "lda");
        assert!(parents.iter().all(|&p| pipeline.is_primary(p)));
    }

    #[test]
    fn converts_descriptor_with_child_listed_first() {
        // Node order in the descriptor is not required to be topological.
        let desc = PipelineDescriptor {
            uid: None,
            nodes: vec![
                node("root", "xgboost", &["a", "b"]),
                node("a", "logit", &[]),
                node("b", "lda", &[]),
            ],
        };
        let pipeline = pipeline_from_descriptor(&desc).unwrap();
        let root = pipeline.root_node().unwrap();
        assert_eq!(pipeline.node(root).unwrap().operation, "xgboost");
        assert_eq!(pipeline.parents(root).len(), 2);
    }

    #[test]
    fn unknown_parent_fails() {
        let desc = PipelineDescriptor {
            uid: None,
            nodes: vec![node("n1", "logit", &[]), node("n2", "xgboost", &["ghost"])],
        };
        let err = pipeline_from_descriptor(&desc).unwrap_err();
        assert!(
            matches!(err, DescribeError::UnknownParent { ref node, ref parent }
                if node == "n2" && parent == "ghost")
        );
    }

    #[test]
    fn duplicate_node_id_fails() {
        let desc = PipelineDescriptor {
            uid: None,
            nodes: vec![node("n1", "logit", &[]), node("n1", "lda", &[])],
        };
        let err = pipeline_from_descriptor(&desc).unwrap_err();
        assert!(matches!(err, DescribeError::DuplicateNodeId { ref id } if id == "n1"));
    }

    #[test]
    fn self_dependency_fails() {
        let desc = PipelineDescriptor {
            uid: None,
            nodes: vec![node("n1", "logit", &["n1"])],
        };
        let err = pipeline_from_descriptor(&desc).unwrap_err();
        assert!(matches!(err, DescribeError::SelfDependency { ref id } if id == "n1"));
    }

    #[test]
    fn cycle_fails() {
        let desc = PipelineDescriptor {
            uid: None,
            nodes: vec![
                node("n1", "logit", &["n2"]),
                node("n2", "lda", &["n1"]),
                node("n3", "xgboost", &["n1", "n2"]),
            ],
        };
        let err = pipeline_from_descriptor(&desc).unwrap_err();
        match err {
            DescribeError::CycleDetected { nodes } => {
                assert_eq!(nodes, vec!["n1", "n2", "n3"]);
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn repeated_parent_fails() {
        let desc = PipelineDescriptor {
            uid: None,
            nodes: vec![node("n1", "logit", &[]), node("n2", "xgboost", &["n1", "n1"])],
        };
        let err = pipeline_from_descriptor(&desc).unwrap_err();
        assert!(matches!(err, DescribeError::InvalidDependency { ref node, .. } if node == "n2"));
    }

    #[test]
    fn to_descriptor_is_deterministic() {
        let pipeline = pipeline_from_descriptor(&ensemble_descriptor()).unwrap();
        let a = pipeline_to_descriptor(&pipeline);
        let b = pipeline_to_descriptor(&pipeline);
        assert_eq!(a, b);
        assert_eq!(a.uid, None);
        assert_eq!(a.nodes.len(), 3);
    }

    #[test]
    fn roundtrip_preserves_structure_and_params() {
        let mut desc = ensemble_descriptor();
        desc.nodes[2]
            .params
            .insert("n_estimators".to_string(), serde_json::json!(100));

        let rt = pipeline_to_descriptor(&pipeline_from_descriptor(&desc).unwrap());
        assert_eq!(shape(&desc), shape(&rt));

        // Canonical form is a fixed point.
        let rt2 = pipeline_to_descriptor(&pipeline_from_descriptor(&rt).unwrap());
        assert_eq!(rt, rt2);
    }

    /// Structural fingerprint: per node its operation, serialized params,
    /// and the sorted operations of its parents; sorted overall. Invariant
    /// under id remapping and node reordering.
    fn shape(desc: &PipelineDescriptor) -> Vec<(String, String, Vec<String>)> {
        let by_id: HashMap<&str, &NodeDescriptor> =
            desc.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        let mut out: Vec<(String, String, Vec<String>)> = desc
            .nodes
            .iter()
            .map(|n| {
                let mut parent_ops: Vec<String> = n
                    .parent_ids
                    .iter()
                    .map(|p| by_id[p.as_str()].operation.clone())
                    .collect();
                parent_ops.sort();
                (
                    n.operation.clone(),
                    serde_json::to_string(&n.params).unwrap(),
                    parent_ops,
                )
            })
            .collect();
        out.sort();
        out
    }

    // -----------------------------------------------------------------------
    // Generative round-trip property
    // -----------------------------------------------------------------------

    const OPS: &[&str] = &["logit", "lda", "knn", "xgboost", "scaling", "pca"];

    /// Builds an acyclic descriptor: node `i` may only reference nodes
    /// `j < i` as parents, so parent ids always resolve and no cycle can
    /// form.
    fn descriptor_from_seed(op_choices: Vec<u8>, parent_masks: Vec<u32>) -> PipelineDescriptor {
        let nodes = op_choices
            .iter()
            .enumerate()
            .map(|(i, &op)| {
                let parent_ids = (0..i)
                    .filter(|j| parent_masks[i] & (1 << j) != 0)
                    .map(|j| format!("n{j}"))
                    .collect();
                NodeDescriptor {
                    id: format!("n{i}"),
                    operation: OPS[op as usize % OPS.len()].to_string(),
                    params: IndexMap::new(),
                    parent_ids,
                }
            })
            .collect();
        PipelineDescriptor { uid: None, nodes }
    }

    proptest! {
        #[test]
        fn roundtrip_any_acyclic_descriptor(
            op_choices in prop::collection::vec(any::<u8>(), 1..10),
            masks in prop::collection::vec(any::<u32>(), 10),
        ) {
            let desc = descriptor_from_seed(op_choices, masks);
            let pipeline = pipeline_from_descriptor(&desc).unwrap();
            let rt = pipeline_to_descriptor(&pipeline);

            prop_assert_eq!(rt.nodes.len(), desc.nodes.len());
            prop_assert_eq!(shape(&desc), shape(&rt));

            let rt2 = pipeline_to_descriptor(&pipeline_from_descriptor(&rt).unwrap());
            prop_assert_eq!(rt, rt2);
        }
    }
}
