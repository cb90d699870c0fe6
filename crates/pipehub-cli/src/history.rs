//! History seeding: run the mock composer across the fixed showcase cases,
//! persist each case's best pipeline, and write OptHistory-style JSON
//! fixture files.
//!
//! Sequential batch work -- one case after another, no parallelism.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use pipehub_core::describe::pipeline_to_descriptor;
use pipehub_core::{PipelineDescriptor, TaskType};
use pipehub_storage::{PipelineStore, StorageError};

use crate::composer::{compose, rng_for};

/// One showcase dataset/metric/task triple.
#[derive(Debug, Clone, Copy)]
pub struct HistoryCase {
    pub history_id: &'static str,
    pub dataset_name: &'static str,
    pub metric: &'static str,
    pub task: TaskType,
}

/// The fixed seeding cases.
pub fn default_cases() -> Vec<HistoryCase> {
    vec![
        HistoryCase {
            history_id: "scoring",
            dataset_name: "scoring",
            metric: "roc_auc",
            task: TaskType::Classification,
        },
        HistoryCase {
            history_id: "metocean",
            dataset_name: "metocean",
            metric: "rmse",
            task: TaskType::TsForecasting,
        },
        HistoryCase {
            history_id: "oil",
            dataset_name: "oil",
            metric: "rmse",
            task: TaskType::Regression,
        },
    ]
}

/// One recorded generation in a history fixture.
#[derive(Debug, Serialize)]
pub struct GenerationRecord {
    pub descriptor: PipelineDescriptor,
    pub fitness: f64,
}

/// The serialized optimization history of one case.
#[derive(Debug, Serialize)]
pub struct HistoryFixture {
    pub history_id: String,
    pub dataset_name: String,
    pub metric: String,
    pub task: TaskType,
    pub generations: Vec<GenerationRecord>,
    /// Uid the best pipeline is persisted under.
    pub best_uid: String,
    pub best_fitness: f64,
}

/// Failures while seeding history.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Seeds a single case: composes candidates, persists the best pipeline,
/// and writes `{out_dir}/{history_id}_{task}.json`.
///
/// Persisting is idempotent: a structurally identical best pipeline from a
/// previous run is detected by the store and not re-written.
pub fn seed_case(
    store: &mut dyn PipelineStore,
    out_dir: &Path,
    case: &HistoryCase,
    generations: usize,
) -> Result<HistoryFixture, SeedError> {
    let mut rng = rng_for(case.history_id);
    let run = compose(case.task, case.metric, generations, &mut rng);

    let best = &run.candidates[run.best_index];
    let outcome = store.create_pipeline(
        Some(&format!("best_{}_pipeline", case.history_id)),
        &best.pipeline,
    )?;

    let fixture = HistoryFixture {
        history_id: case.history_id.to_string(),
        dataset_name: case.dataset_name.to_string(),
        metric: case.metric.to_string(),
        task: case.task,
        generations: run
            .candidates
            .iter()
            .map(|candidate| GenerationRecord {
                descriptor: pipeline_to_descriptor(&candidate.pipeline),
                fitness: candidate.fitness,
            })
            .collect(),
        best_uid: outcome.uid,
        best_fitness: best.fitness,
    };

    fs::create_dir_all(out_dir)?;
    let path = fixture_path(out_dir, case);
    fs::write(&path, serde_json::to_string_pretty(&fixture)?)?;

    Ok(fixture)
}

/// Seeds every default case in order.
pub fn seed_all(
    store: &mut dyn PipelineStore,
    out_dir: &Path,
    generations: usize,
) -> Result<Vec<HistoryFixture>, SeedError> {
    let mut fixtures = Vec::new();
    for case in default_cases() {
        fixtures.push(seed_case(store, out_dir, &case, generations)?);
    }
    Ok(fixtures)
}

/// The fixture file location for a case.
pub fn fixture_path(out_dir: &Path, case: &HistoryCase) -> PathBuf {
    out_dir.join(format!("{}_{}.json", case.history_id, case.task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipehub_storage::InMemoryStore;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pipehub-history-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn seed_case_persists_best_and_writes_fixture() {
        let mut store = InMemoryStore::new();
        let out_dir = scratch_dir("case");
        let case = default_cases()[0];

        let fixture = seed_case(&mut store, &out_dir, &case, 6).unwrap();
        assert_eq!(fixture.history_id, "scoring");
        assert_eq!(fixture.generations.len(), 6);
        assert_eq!(fixture.best_uid, "best_scoring_pipeline");
        assert!(store.pipeline_exists(&fixture.best_uid).unwrap());

        // The written file parses and references the persisted uid.
        let raw = fs::read_to_string(fixture_path(&out_dir, &case)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["best_uid"], "best_scoring_pipeline");
        assert_eq!(parsed["task"], "classification");
        assert_eq!(parsed["generations"].as_array().unwrap().len(), 6);

        fs::remove_dir_all(&out_dir).unwrap();
    }

    #[test]
    fn reseeding_is_idempotent() {
        let mut store = InMemoryStore::new();
        let out_dir = scratch_dir("idem");
        let case = default_cases()[2];

        let first = seed_case(&mut store, &out_dir, &case, 5).unwrap();
        let second = seed_case(&mut store, &out_dir, &case, 5).unwrap();
        assert_eq!(first.best_uid, second.best_uid);
        assert_eq!(store.list_pipelines().unwrap().len(), 1);

        fs::remove_dir_all(&out_dir).unwrap();
    }

    #[test]
    fn seed_all_covers_every_case() {
        let mut store = InMemoryStore::new();
        let out_dir = scratch_dir("all");

        let fixtures = seed_all(&mut store, &out_dir, 4).unwrap();
        assert_eq!(fixtures.len(), 3);
        for case in default_cases() {
            assert!(fixture_path(&out_dir, &case).exists());
        }
        // Every fixture's best uid resolves in the store, whatever uid the
        // structural dedup settled on.
        for fixture in &fixtures {
            assert!(store.pipeline_exists(&fixture.best_uid).unwrap());
        }

        fs::remove_dir_all(&out_dir).unwrap();
    }
}
