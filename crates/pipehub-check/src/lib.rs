//! Structural validation for pipeline graphs.
//!
//! Two entry points:
//! - [`validate_pipeline`]: runs every structural rule and reports ALL
//!   violations at once as typed diagnostics.
//! - [`verdict`]: normalizes the diagnostics into a boolean plus a
//!   human-readable message for API responses.
//!
//! Both functions are pure -- they read the pipeline but do not modify it.
//! Conversion failures are a different concern: a descriptor that cannot be
//! turned into a `Pipeline` at all never reaches this crate.

pub mod diagnostics;
pub mod rules;

pub use diagnostics::{ValidationError, ValidationVerdict};

use pipehub_core::Pipeline;

/// Validates the entire pipeline and reports ALL violations at once.
///
/// Does NOT stop at the first error. An empty diagnostic list means the
/// pipeline is structurally valid.
pub fn validate_pipeline(pipeline: &Pipeline) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    rules::non_empty(pipeline, &mut errors);
    if pipeline.is_empty() {
        // Every other rule would only add noise for an empty graph.
        return errors;
    }

    rules::acyclic(pipeline, &mut errors);
    rules::single_root(pipeline, &mut errors);
    rules::no_isolated_nodes(pipeline, &mut errors);
    rules::known_operations(pipeline, &mut errors);
    rules::final_operation_is_model(pipeline, &mut errors);

    errors
}

/// Normalized validation outcome for a pipeline.
pub fn verdict(pipeline: &Pipeline) -> ValidationVerdict {
    let errors = validate_pipeline(pipeline);
    if errors.is_empty() {
        ValidationVerdict::correct()
    } else {
        ValidationVerdict::from_errors(&errors)
    }
}
