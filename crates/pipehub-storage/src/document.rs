//! Encoding between pipelines and their stored document form.
//!
//! Documents are the serialized wire descriptor (JSON TEXT), so anything
//! the codec can express round-trips through storage. Decoding failures
//! surface as [`StorageError::DocumentCorrupted`] with the offending uid.

use pipehub_core::describe::{pipeline_from_descriptor, pipeline_to_descriptor};
use pipehub_core::{Pipeline, PipelineDescriptor};

use crate::error::StorageError;

/// Serializes a pipeline into its document form.
pub fn encode(pipeline: &Pipeline) -> Result<String, StorageError> {
    let descriptor = pipeline_to_descriptor(pipeline);
    Ok(serde_json::to_string(&descriptor)?)
}

/// Reconstructs a pipeline from a stored document.
pub fn decode(uid: &str, document: &str) -> Result<Pipeline, StorageError> {
    let descriptor: PipelineDescriptor =
        serde_json::from_str(document).map_err(|e| StorageError::DocumentCorrupted {
            uid: uid.to_string(),
            reason: e.to_string(),
        })?;
    pipeline_from_descriptor(&descriptor).map_err(|e| StorageError::DocumentCorrupted {
        uid: uid.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipehub_core::templates;

    #[test]
    fn encode_decode_roundtrip() {
        let pipeline = templates::two_level_ensemble();
        let document = encode(&pipeline).unwrap();
        let back = decode("p1", &document).unwrap();
        assert_eq!(back.node_count(), pipeline.node_count());
        assert_eq!(back.edge_count(), pipeline.edge_count());
    }

    #[test]
    fn decode_garbage_is_corrupt_not_missing() {
        let err = decode("p1", "{not json").unwrap_err();
        assert!(matches!(err, StorageError::DocumentCorrupted { ref uid, .. } if uid == "p1"));
    }

    #[test]
    fn decode_unconvertible_descriptor_is_corrupt() {
        let document = r#"{"nodes":[{"id":"a","operation":"logit","parent_ids":["ghost"]}]}"#;
        let err = decode("p2", document).unwrap_err();
        assert!(matches!(err, StorageError::DocumentCorrupted { ref uid, .. } if uid == "p2"));
    }
}
