//! Pipeline: the DAG container for ML operator graphs.
//!
//! [`Pipeline`] is the single entry point for constructing and querying
//! operator graphs. The graph is private; all mutations go through
//! `Pipeline` methods so structural invariants (no self-dependencies, no
//! duplicate parent slots) hold by construction. Read-only accessors are
//! provided for traversals and queries.
//!
//! Terminology: a *primary* node has no incoming dependency edges (it reads
//! source data directly); a *secondary* node consumes the outputs of its
//! parents. The *root* is the unique node no other node consumes — the
//! pipeline's final operator.

use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::edge::DependencyEdge;
use crate::error::CoreError;
use crate::id::{EdgeId, NodeId};
use crate::node::OperatorNode;

/// A directed acyclic graph of ML operators.
///
/// Acyclicity is not enforced on every mutation (cycle checks are a
/// validation concern, see pipehub-check); the builder methods enforce only
/// local invariants. Node and edge identity is stable across removals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pipeline {
    graph: StableGraph<OperatorNode, DependencyEdge, Directed, u32>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Pipeline {
            graph: StableGraph::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Builder methods
    // -----------------------------------------------------------------------

    /// Adds an operator node, returning its [`NodeId`].
    pub fn add_node(&mut self, node: OperatorNode) -> NodeId {
        NodeId::from(self.graph.add_node(node))
    }

    /// Adds a dependency from `parent` to `child` at the given input position.
    ///
    /// Errors if either node is missing, if `parent == child`, if the pair is
    /// already connected, or if the child already has a parent at
    /// `input_index`.
    pub fn add_dependency(
        &mut self,
        parent: NodeId,
        child: NodeId,
        input_index: u16,
    ) -> Result<EdgeId, CoreError> {
        let parent_idx = parent.into();
        let child_idx = child.into();

        if self.graph.node_weight(parent_idx).is_none() {
            return Err(CoreError::NodeNotFound { id: parent });
        }
        if self.graph.node_weight(child_idx).is_none() {
            return Err(CoreError::NodeNotFound { id: child });
        }
        if parent == child {
            return Err(CoreError::InvalidDependency {
                reason: format!("node {} cannot depend on itself", child),
            });
        }
        if self.graph.find_edge(parent_idx, child_idx).is_some() {
            return Err(CoreError::InvalidDependency {
                reason: format!("duplicate dependency {} -> {}", parent, child),
            });
        }
        let slot_taken = self
            .graph
            .edges_directed(child_idx, Direction::Incoming)
            .any(|e| e.weight().input_index == input_index);
        if slot_taken {
            return Err(CoreError::InvalidDependency {
                reason: format!(
                    "input index {} of node {} is already occupied",
                    input_index, child
                ),
            });
        }

        let idx = self
            .graph
            .add_edge(parent_idx, child_idx, DependencyEdge::new(input_index));
        Ok(EdgeId::from(idx))
    }

    /// Removes a node and all its connected edges, returning the removed
    /// operator. Errors if the node is not found.
    pub fn remove_node(&mut self, id: NodeId) -> Result<OperatorNode, CoreError> {
        match self.graph.remove_node(id.into()) {
            Some(node) => Ok(node),
            None => Err(CoreError::NodeNotFound { id }),
        }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Looks up an operator node by ID.
    pub fn node(&self, id: NodeId) -> Option<&OperatorNode> {
        self.graph.node_weight(id.into())
    }

    /// Looks up an operator node by ID (mutable, e.g. for parameter updates).
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut OperatorNode> {
        self.graph.node_weight_mut(id.into())
    }

    /// Iterates all nodes in ascending index order (stable across calls).
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &OperatorNode)> {
        self.graph
            .node_indices()
            .map(|idx| (NodeId::from(idx), &self.graph[idx]))
    }

    /// Returns the parents of a node, ordered by input index.
    pub fn parents(&self, id: NodeId) -> Vec<NodeId> {
        let mut parents: Vec<(u16, NodeId)> = self
            .graph
            .edges_directed(id.into(), Direction::Incoming)
            .map(|e| (e.weight().input_index, NodeId::from(e.source())))
            .collect();
        parents.sort_by_key(|(input_index, _)| *input_index);
        parents.into_iter().map(|(_, id)| id).collect()
    }

    /// Returns the children of a node in ascending index order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children: Vec<NodeId> = self
            .graph
            .edges_directed(id.into(), Direction::Outgoing)
            .map(|e| NodeId::from(e.target()))
            .collect();
        children.sort();
        children
    }

    /// Returns `true` if the node has no parents.
    pub fn is_primary(&self, id: NodeId) -> bool {
        self.graph
            .edges_directed(id.into(), Direction::Incoming)
            .next()
            .is_none()
    }

    /// Returns all nodes with no consumers, in ascending index order.
    ///
    /// A well-formed pipeline has exactly one; anything else is a structural
    /// violation reported by validation.
    pub fn sinks(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(NodeId::from)
            .collect()
    }

    /// Returns the unique root node, or `None` if the pipeline is empty or
    /// has more than one sink.
    pub fn root_node(&self) -> Option<NodeId> {
        let sinks = self.sinks();
        match sinks.as_slice() {
            [root] => Some(*root),
            _ => None,
        }
    }

    /// Returns the number of operator nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the pipeline has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns `true` if the dependency graph contains a cycle.
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Returns the nodes in topological order (parents before children),
    /// or `None` when the graph is cyclic.
    pub fn topological_order(&self) -> Option<Vec<NodeId>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(NodeId::from).collect())
    }

    /// Returns the length of the longest parent chain, or `None` when the
    /// graph is cyclic. A single node has depth 1.
    pub fn depth(&self) -> Option<usize> {
        let order = toposort(&self.graph, None).ok()?;
        let mut depth = std::collections::HashMap::new();
        let mut max_depth = 0usize;
        for idx in order {
            let d = self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .filter_map(|p| depth.get(&p).copied())
                .max()
                .unwrap_or(0)
                + 1;
            depth.insert(idx, d);
            max_depth = max_depth.max(d);
        }
        Some(max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_chain() -> (Pipeline, NodeId, NodeId) {
        let mut pipeline = Pipeline::new();
        let scaling = pipeline.add_node(OperatorNode::new("scaling"));
        let logit = pipeline.add_node(OperatorNode::new("logit"));
        pipeline.add_dependency(scaling, logit, 0).unwrap();
        (pipeline, scaling, logit)
    }

    #[test]
    fn basic_construction() {
        let (pipeline, scaling, logit) = linear_chain();
        assert_eq!(pipeline.node_count(), 2);
        assert_eq!(pipeline.edge_count(), 1);
        assert!(pipeline.is_primary(scaling));
        assert!(!pipeline.is_primary(logit));
        assert_eq!(pipeline.root_node(), Some(logit));
    }

    #[test]
    fn parents_ordered_by_input_index() {
        let mut pipeline = Pipeline::new();
        let a = pipeline.add_node(OperatorNode::new("logit"));
        let b = pipeline.add_node(OperatorNode::new("lda"));
        let root = pipeline.add_node(OperatorNode::new("xgboost"));
        // Attach in reverse slot order; parents() must still come back
        // ordered by input index.
        pipeline.add_dependency(b, root, 1).unwrap();
        pipeline.add_dependency(a, root, 0).unwrap();
        assert_eq!(pipeline.parents(root), vec![a, b]);
    }

    #[test]
    fn self_dependency_rejected() {
        let mut pipeline = Pipeline::new();
        let n = pipeline.add_node(OperatorNode::new("logit"));
        let err = pipeline.add_dependency(n, n, 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDependency { .. }));
    }

    #[test]
    fn duplicate_dependency_rejected() {
        let (mut pipeline, scaling, logit) = linear_chain();
        let err = pipeline.add_dependency(scaling, logit, 1).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDependency { .. }));
    }

    #[test]
    fn occupied_input_slot_rejected() {
        let mut pipeline = Pipeline::new();
        let a = pipeline.add_node(OperatorNode::new("logit"));
        let b = pipeline.add_node(OperatorNode::new("lda"));
        let root = pipeline.add_node(OperatorNode::new("xgboost"));
        pipeline.add_dependency(a, root, 0).unwrap();
        let err = pipeline.add_dependency(b, root, 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDependency { .. }));
    }

    #[test]
    fn dependency_to_missing_node_errors() {
        let mut pipeline = Pipeline::new();
        let n = pipeline.add_node(OperatorNode::new("logit"));
        let err = pipeline.add_dependency(n, NodeId(99), 0).unwrap_err();
        assert!(matches!(err, CoreError::NodeNotFound { id: NodeId(99) }));
    }

    #[test]
    fn remove_node_removes_edges() {
        let (mut pipeline, scaling, _) = linear_chain();
        let removed = pipeline.remove_node(scaling).unwrap();
        assert_eq!(removed.operation, "scaling");
        assert_eq!(pipeline.node_count(), 1);
        assert_eq!(pipeline.edge_count(), 0);
    }

    #[test]
    fn multiple_sinks_have_no_root() {
        let mut pipeline = Pipeline::new();
        pipeline.add_node(OperatorNode::new("logit"));
        pipeline.add_node(OperatorNode::new("lda"));
        assert_eq!(pipeline.sinks().len(), 2);
        assert_eq!(pipeline.root_node(), None);
    }

    #[test]
    fn depth_of_linear_chain() {
        let (pipeline, _, _) = linear_chain();
        assert_eq!(pipeline.depth(), Some(2));
    }

    #[test]
    fn depth_of_cyclic_graph_is_none() {
        let (mut pipeline, scaling, logit) = linear_chain();
        pipeline.add_dependency(logit, scaling, 0).unwrap();
        assert!(pipeline.has_cycle());
        assert_eq!(pipeline.depth(), None);
    }

    #[test]
    fn serde_roundtrip() {
        let (pipeline, _, logit) = linear_chain();
        let json = serde_json::to_string(&pipeline).unwrap();
        let back: Pipeline = serde_json::from_str(&json).unwrap();
        assert_eq!(back.node_count(), 2);
        assert_eq!(back.root_node(), Some(logit));
    }
}
