//! Deterministic structural hashing of pipelines using blake3.
//!
//! The hash identifies a pipeline by its *structure*: operations, params,
//! and parent wiring. Uids and internal node ids do not participate, so two
//! pipelines built in different node orders (or stored under different
//! uids) hash identically when their shape matches. Hashes are derived
//! state, never stored authority: the store recomputes them on write.
//!
//! # Composition
//!
//! - **Level 1**: node content hash (operation + params with sorted keys)
//! - **Level 2**: composite node hash (content + parent composites in
//!   input order, Merkle-style)
//! - **Level 3**: pipeline hash (sink composites in sorted byte order)
//!
//! Determinism is ensured by sorting param keys, walking nodes in
//! topological order, and sorting sink hashes before the final
//! composition.

use std::collections::HashMap;

use pipehub_core::{NodeId, OperatorNode, Pipeline};

/// Computes a blake3 hash of a node's content (operation + params).
///
/// Param keys are sorted before hashing so insertion order does not leak
/// into the hash; param values are canonicalized via `serde_json::to_vec`.
pub fn hash_node_content(node: &OperatorNode) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(node.operation.as_bytes());
    hasher.update(&[0]);

    let mut keys: Vec<&String> = node.params.keys().collect();
    keys.sort();
    for key in keys {
        hasher.update(key.as_bytes());
        hasher.update(&[0]);
        let value_bytes = serde_json::to_vec(&node.params[key.as_str()])
            .expect("JSON value serialization should never fail");
        hasher.update(&value_bytes);
        hasher.update(&[0]);
    }

    hasher.finalize()
}

/// Computes the structural hash of a pipeline.
///
/// Walks nodes in topological order, composing each node's content hash
/// with its parents' composite hashes (in input order), then combines the
/// sink composites in sorted byte order. Cyclic graphs (which validation
/// rejects, but the store must not loop on) degrade to a content-only
/// hash over all nodes.
pub fn structural_hash(pipeline: &Pipeline) -> blake3::Hash {
    let Some(order) = pipeline.topological_order() else {
        return content_only_hash(pipeline);
    };

    let mut composites: HashMap<NodeId, blake3::Hash> = HashMap::with_capacity(order.len());
    for id in order {
        let node = pipeline
            .node(id)
            .expect("topological order only yields live nodes");
        let mut hasher = blake3::Hasher::new();
        hasher.update(hash_node_content(node).as_bytes());
        for parent in pipeline.parents(id) {
            hasher.update(composites[&parent].as_bytes());
        }
        composites.insert(id, hasher.finalize());
    }

    let mut sink_hashes: Vec<[u8; 32]> = pipeline
        .sinks()
        .iter()
        .map(|s| *composites[s].as_bytes())
        .collect();
    sink_hashes.sort();

    let mut hasher = blake3::Hasher::new();
    for h in &sink_hashes {
        hasher.update(h);
    }
    hasher.finalize()
}

/// Hex form of [`structural_hash`], as stored in the `structural_hash`
/// column.
pub fn structural_hash_hex(pipeline: &Pipeline) -> String {
    structural_hash(pipeline).to_hex().to_string()
}

/// Fallback for cyclic graphs: combine per-node content hashes in sorted
/// order, ignoring edges.
fn content_only_hash(pipeline: &Pipeline) -> blake3::Hash {
    let mut hashes: Vec<[u8; 32]> = pipeline
        .nodes()
        .map(|(_, node)| *hash_node_content(node).as_bytes())
        .collect();
    hashes.sort();

    let mut hasher = blake3::Hasher::new();
    for h in &hashes {
        hasher.update(h);
    }
    hasher.finalize()
}
