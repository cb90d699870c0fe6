//! Pipehub tools CLI.
//!
//! Provides the `pipehub` binary with subcommands for seeding showcase
//! optimization histories into the store (`seed-history`) and validating
//! pipeline descriptor files offline (`validate`).

mod composer;
mod history;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use pipehub_core::describe::pipeline_from_descriptor;
use pipehub_core::PipelineDescriptor;
use pipehub_storage::SqliteStore;

/// Pipehub pipeline tools.
#[derive(Parser)]
#[command(name = "pipehub", about = "Pipeline service tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Seed showcase optimization histories and best pipelines.
    SeedHistory {
        /// Path to the pipeline database file.
        #[arg(short, long, default_value = "pipehub.db")]
        db: String,

        /// Directory for history fixture files.
        #[arg(short, long, default_value = "fixtures")]
        out: PathBuf,

        /// Composer generations per case.
        #[arg(short, long, default_value_t = 10)]
        generations: usize,
    },

    /// Validate a pipeline descriptor JSON file.
    Validate {
        /// Path to the descriptor file.
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::SeedHistory {
            db,
            out,
            generations,
        } => run_seed_history(&db, &out, generations),
        Commands::Validate { file } => run_validate(&file),
    };
    process::exit(exit_code);
}

/// Execute the seed-history subcommand.
///
/// Returns exit code: 0 = success, 1 = seeding error, 3 = I/O error
/// opening the database.
fn run_seed_history(db_path: &str, out_dir: &PathBuf, generations: usize) -> i32 {
    let mut store = match SqliteStore::new(db_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", db_path, e);
            return 3;
        }
    };

    match history::seed_all(&mut store, out_dir, generations) {
        Ok(fixtures) => {
            for fixture in &fixtures {
                println!(
                    "{}: {} generations, best {} (fitness {:.4})",
                    fixture.history_id,
                    fixture.generations.len(),
                    fixture.best_uid,
                    fixture.best_fitness,
                );
            }
            println!("history fixtures written to {}", out_dir.display());
            0
        }
        Err(e) => {
            eprintln!("Error: seeding failed: {}", e);
            1
        }
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 = valid, 1 = structurally invalid,
/// 2 = unreadable or unconvertible descriptor.
fn run_validate(file: &PathBuf) -> i32 {
    let raw = match std::fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", file.display(), e);
            return 2;
        }
    };

    let descriptor: PipelineDescriptor = match serde_json::from_str(&raw) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            eprintln!("Error: '{}' is not a descriptor: {}", file.display(), e);
            return 2;
        }
    };

    let pipeline = match pipeline_from_descriptor(&descriptor) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Error: conversion failed: {}", e);
            return 2;
        }
    };

    let verdict = pipehub_check::verdict(&pipeline);
    println!("{}", verdict.message);
    if verdict.is_valid {
        0
    } else {
        1
    }
}
