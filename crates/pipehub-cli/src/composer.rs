//! Mock composer: a seeded structure search over task templates.
//!
//! The real optimization machinery lives outside this repository; history
//! seeding only needs plausible candidate sequences. The mock starts from
//! the task's template pipeline and applies random structural mutations
//! (swap a model, attach a preprocessing parent), scoring each candidate
//! with a deterministic pseudo-fitness. Lower fitness is better.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use pipehub_core::{operations, templates, OperatorNode, Pipeline, TaskType};

/// One evaluated candidate in a composer run.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub pipeline: Pipeline,
    pub fitness: f64,
}

/// The full candidate sequence of a composer run.
#[derive(Debug, Clone)]
pub struct ComposerRun {
    /// Candidates in generation order.
    pub candidates: Vec<Candidate>,
    /// Index of the lowest-fitness candidate.
    pub best_index: usize,
}

/// Runs the mock composer for `generations` rounds.
///
/// Greedy walk: each round mutates the best pipeline seen so far; the
/// mutated candidate replaces it when its fitness improves. Fully
/// deterministic for a given rng state.
pub fn compose(
    task: TaskType,
    metric: &str,
    generations: usize,
    rng: &mut ChaCha8Rng,
) -> ComposerRun {
    let mut current = templates::template_for_task(task);
    let mut current_fitness = mock_fitness(&current, metric, rng);

    let mut candidates = vec![Candidate {
        pipeline: current.clone(),
        fitness: current_fitness,
    }];
    let mut best_index = 0;

    for generation in 1..generations.max(1) {
        let mutated = mutate(&current, task, rng);
        let fitness = mock_fitness(&mutated, metric, rng);
        candidates.push(Candidate {
            pipeline: mutated.clone(),
            fitness,
        });
        if fitness < current_fitness {
            current = mutated;
            current_fitness = fitness;
            best_index = generation;
        }
    }

    ComposerRun {
        candidates,
        best_index,
    }
}

/// Applies one structural mutation, preserving validity: models are only
/// swapped for task-appropriate models, and preprocessing is only attached
/// above primary nodes.
fn mutate(pipeline: &Pipeline, task: TaskType, rng: &mut ChaCha8Rng) -> Pipeline {
    let mut mutated = pipeline.clone();

    if rng.gen_bool(0.5) {
        swap_model(&mut mutated, task, rng);
    } else {
        attach_preprocessing(&mut mutated, task, rng);
    }
    mutated
}

/// Replaces a random model node's operation with another model supporting
/// the task.
fn swap_model(pipeline: &mut Pipeline, task: TaskType, rng: &mut ChaCha8Rng) {
    let model_nodes: Vec<_> = pipeline
        .nodes()
        .filter(|(_, node)| operations::is_model(&node.operation))
        .map(|(id, _)| id)
        .collect();
    let Some(&target) = model_nodes.as_slice().choose(rng) else {
        return;
    };

    let models = operations::models_for(task);
    let Some(&replacement) = models.as_slice().choose(rng) else {
        return;
    };
    if let Some(node) = pipeline.node_mut(target) {
        node.operation = replacement.to_string();
    }
}

/// Inserts a data operation as the parent of a random primary node.
fn attach_preprocessing(pipeline: &mut Pipeline, task: TaskType, rng: &mut ChaCha8Rng) {
    let primaries: Vec<_> = pipeline
        .nodes()
        .map(|(id, _)| id)
        .filter(|&id| pipeline.is_primary(id))
        .collect();
    let Some(&target) = primaries.as_slice().choose(rng) else {
        return;
    };

    let data_ops = operations::data_operations_for(task);
    let Some(&operation) = data_ops.as_slice().choose(rng) else {
        return;
    };

    let parent = pipeline.add_node(OperatorNode::new(operation));
    // target was primary, so input slot 0 is free.
    pipeline
        .add_dependency(parent, target, 0)
        .expect("attaching above a primary node cannot fail");
}

/// Deterministic pseudo-fitness. Lower is better for every metric; roc_auc
/// scores are negated to keep that convention.
fn mock_fitness(pipeline: &Pipeline, metric: &str, rng: &mut ChaCha8Rng) -> f64 {
    let depth = pipeline.depth().unwrap_or(pipeline.node_count()) as f64;
    let nodes = pipeline.node_count() as f64;
    let noise: f64 = rng.gen_range(0.0..0.05);
    let score = 1.0 / (1.0 + 0.3 * depth + 0.1 * nodes) + noise;

    match metric {
        "roc_auc" => -score,
        _ => 1.0 - score,
    }
}

/// Builds the seeded rng for a history case. Identical ids always produce
/// identical runs.
pub fn rng_for(history_id: &str) -> ChaCha8Rng {
    use rand::SeedableRng;

    let mut seed = [0u8; 32];
    for (i, byte) in history_id.bytes().take(32).enumerate() {
        seed[i] = byte;
    }
    ChaCha8Rng::from_seed(seed)
}
