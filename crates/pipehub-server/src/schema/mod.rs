//! Request/response DTOs for the HTTP API.
//!
//! The wire descriptor itself ([`pipehub_core::PipelineDescriptor`]) and
//! the validation verdict ([`pipehub_check::ValidationVerdict`]) are used
//! directly as bodies; this module adds the response shapes that exist
//! only at the API boundary.

pub mod pipelines;
