//! SQLite implementation of [`PipelineStore`].
//!
//! [`SqliteStore`] persists pipeline documents in a SQLite database with
//! WAL mode, a transaction around every write, and automatic schema
//! migrations. Documents are stored as JSON TEXT (the serialized wire
//! descriptor), making this a small document store keyed by uid.

use rusqlite::{params, Connection, OptionalExtension};

use pipehub_core::Pipeline;

use crate::document;
use crate::error::StorageError;
use crate::hash::structural_hash_hex;
use crate::traits::PipelineStore;
use crate::types::{CreateOutcome, PipelineSummary};

/// SQLite-backed implementation of [`PipelineStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    fn find_uid_by_hash(&self, hash: &str) -> Result<Option<String>, StorageError> {
        let uid = self
            .conn
            .query_row(
                "SELECT uid FROM pipelines WHERE structural_hash = ?1 ORDER BY uid LIMIT 1",
                params![hash],
                |row| row.get(0),
            )
            .optional()?;
        Ok(uid)
    }
}

impl PipelineStore for SqliteStore {
    fn create_pipeline(
        &mut self,
        uid: Option<&str>,
        pipeline: &Pipeline,
    ) -> Result<CreateOutcome, StorageError> {
        let hash = structural_hash_hex(pipeline);
        if let Some(existing) = self.find_uid_by_hash(&hash)? {
            return Ok(CreateOutcome {
                uid: existing,
                already_existed: true,
            });
        }

        let uid = uid
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let doc = document::encode(pipeline)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO pipelines (uid, structural_hash, node_count, document)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(uid) DO UPDATE SET
                 structural_hash = excluded.structural_hash,
                 node_count = excluded.node_count,
                 document = excluded.document",
            params![uid, hash, pipeline.node_count() as i64, doc],
        )?;
        tx.commit()?;

        Ok(CreateOutcome {
            uid,
            already_existed: false,
        })
    }

    fn get_pipeline(&self, uid: &str) -> Result<Option<Pipeline>, StorageError> {
        let doc: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM pipelines WHERE uid = ?1",
                params![uid],
                |row| row.get(0),
            )
            .optional()?;
        match doc {
            Some(doc) => Ok(Some(document::decode(uid, &doc)?)),
            None => Ok(None),
        }
    }

    fn pipeline_exists(&self, uid: &str) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM pipelines WHERE uid = ?1)",
            params![uid],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn delete_pipeline(&mut self, uid: &str) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM pipelines WHERE uid = ?1", params![uid])?;
        tx.commit()?;
        if deleted == 0 {
            return Err(StorageError::PipelineNotFound(uid.to_string()));
        }
        Ok(())
    }

    fn list_pipelines(&self) -> Result<Vec<PipelineSummary>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT uid, node_count, structural_hash FROM pipelines ORDER BY uid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PipelineSummary {
                uid: row.get(0)?,
                node_count: row.get::<_, i64>(1)? as usize,
                structural_hash: row.get(2)?,
            })
        })?;
        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }

    fn find_by_structure(
        &self,
        pipeline: &Pipeline,
    ) -> Result<Option<String>, StorageError> {
        self.find_uid_by_hash(&structural_hash_hex(pipeline))
    }
}
