//! In-memory implementation of [`PipelineStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral
//! sessions. It stores documents in a HashMap with identical semantics to
//! the SQLite backend.

use std::collections::HashMap;

use pipehub_core::Pipeline;

use crate::document;
use crate::error::StorageError;
use crate::hash::structural_hash_hex;
use crate::traits::PipelineStore;
use crate::types::{CreateOutcome, PipelineSummary};

/// Data stored for a single pipeline.
#[derive(Debug, Clone)]
struct StoredDocument {
    document: String,
    structural_hash: String,
    node_count: usize,
}

/// HashMap-backed store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pipelines: HashMap<String, StoredDocument>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        InMemoryStore::default()
    }
}

impl PipelineStore for InMemoryStore {
    fn create_pipeline(
        &mut self,
        uid: Option<&str>,
        pipeline: &Pipeline,
    ) -> Result<CreateOutcome, StorageError> {
        if let Some(existing) = self.find_by_structure(pipeline)? {
            return Ok(CreateOutcome {
                uid: existing,
                already_existed: true,
            });
        }

        let uid = uid
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let stored = StoredDocument {
            document: document::encode(pipeline)?,
            structural_hash: structural_hash_hex(pipeline),
            node_count: pipeline.node_count(),
        };
        self.pipelines.insert(uid.clone(), stored);

        Ok(CreateOutcome {
            uid,
            already_existed: false,
        })
    }

    fn get_pipeline(&self, uid: &str) -> Result<Option<Pipeline>, StorageError> {
        match self.pipelines.get(uid) {
            Some(stored) => Ok(Some(document::decode(uid, &stored.document)?)),
            None => Ok(None),
        }
    }

    fn pipeline_exists(&self, uid: &str) -> Result<bool, StorageError> {
        Ok(self.pipelines.contains_key(uid))
    }

    fn delete_pipeline(&mut self, uid: &str) -> Result<(), StorageError> {
        match self.pipelines.remove(uid) {
            Some(_) => Ok(()),
            None => Err(StorageError::PipelineNotFound(uid.to_string())),
        }
    }

    fn list_pipelines(&self) -> Result<Vec<PipelineSummary>, StorageError> {
        let mut summaries: Vec<PipelineSummary> = self
            .pipelines
            .iter()
            .map(|(uid, stored)| PipelineSummary {
                uid: uid.clone(),
                node_count: stored.node_count,
                structural_hash: stored.structural_hash.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| a.uid.cmp(&b.uid));
        Ok(summaries)
    }

    fn find_by_structure(
        &self,
        pipeline: &Pipeline,
    ) -> Result<Option<String>, StorageError> {
        let hash = structural_hash_hex(pipeline);
        // Smallest matching uid for determinism.
        Ok(self
            .pipelines
            .iter()
            .filter(|(_, stored)| stored.structural_hash == hash)
            .map(|(uid, _)| uid.clone())
            .min())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipehub_core::templates;

    #[test]
    fn create_and_get_roundtrip() {
        let mut store = InMemoryStore::new();
        let pipeline = templates::two_level_ensemble();

        let outcome = store.create_pipeline(Some("ens"), &pipeline).unwrap();
        assert_eq!(outcome.uid, "ens");
        assert!(!outcome.already_existed);

        let loaded = store.get_pipeline("ens").unwrap().unwrap();
        assert_eq!(loaded.node_count(), pipeline.node_count());
    }

    #[test]
    fn get_unknown_uid_is_none() {
        let store = InMemoryStore::new();
        assert!(store.get_pipeline("ghost").unwrap().is_none());
    }

    #[test]
    fn same_structure_is_deduplicated() {
        let mut store = InMemoryStore::new();
        let first = store
            .create_pipeline(Some("a"), &templates::two_level_ensemble())
            .unwrap();
        let second = store
            .create_pipeline(Some("b"), &templates::two_level_ensemble())
            .unwrap();

        assert!(!first.already_existed);
        assert!(second.already_existed);
        assert_eq!(second.uid, "a");
        assert_eq!(store.list_pipelines().unwrap().len(), 1);
    }

    #[test]
    fn missing_uid_gets_generated() {
        let mut store = InMemoryStore::new();
        let outcome = store
            .create_pipeline(None, &templates::classification_baseline())
            .unwrap();
        assert!(!outcome.uid.is_empty());
        assert!(store.pipeline_exists(&outcome.uid).unwrap());
    }

    #[test]
    fn delete_unknown_uid_errors() {
        let mut store = InMemoryStore::new();
        let err = store.delete_pipeline("ghost").unwrap_err();
        assert!(matches!(err, StorageError::PipelineNotFound(ref uid) if uid == "ghost"));
    }

    #[test]
    fn list_is_sorted_by_uid() {
        let mut store = InMemoryStore::new();
        store
            .create_pipeline(Some("b"), &templates::classification_baseline())
            .unwrap();
        store
            .create_pipeline(Some("a"), &templates::regression_baseline())
            .unwrap();

        let uids: Vec<String> = store
            .list_pipelines()
            .unwrap()
            .into_iter()
            .map(|s| s.uid)
            .collect();
        assert_eq!(uids, vec!["a", "b"]);
    }
}
