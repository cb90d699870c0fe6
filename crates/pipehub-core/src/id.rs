//! Stable ID newtypes for pipeline graph entities.
//!
//! IDs are distinct newtype wrappers over `u32`, so a `NodeId` cannot be
//! accidentally used where an `EdgeId` is expected.

use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};

/// Stable node identifier. Maps to a petgraph `NodeIndex<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Stable dependency edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Bridge between the ID newtypes and petgraph's index types.

impl From<NodeIndex<u32>> for NodeId {
    fn from(idx: NodeIndex<u32>) -> Self {
        NodeId(idx.index() as u32)
    }
}

impl From<NodeId> for NodeIndex<u32> {
    fn from(id: NodeId) -> Self {
        NodeIndex::new(id.0 as usize)
    }
}

impl From<EdgeIndex<u32>> for EdgeId {
    fn from(idx: EdgeIndex<u32>) -> Self {
        EdgeId(idx.index() as u32)
    }
}

impl From<EdgeId> for EdgeIndex<u32> {
    fn from(id: EdgeId) -> Self {
        EdgeIndex::new(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_to_node_index_roundtrip() {
        let idx = NodeIndex::<u32>::new(42);
        let node_id = NodeId::from(idx);
        assert_eq!(node_id.0, 42);

        let back: NodeIndex<u32> = node_id.into();
        assert_eq!(back.index(), 42);
    }

    #[test]
    fn node_id_display() {
        assert_eq!(format!("{}", NodeId(7)), "7");
    }

    #[test]
    fn serde_roundtrip() {
        let node = NodeId(42);
        let json = serde_json::to_string(&node).unwrap();
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
