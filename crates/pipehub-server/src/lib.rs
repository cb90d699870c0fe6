//! HTTP/JSON API for pipeline CRUD and validation.
//!
//! Exposes REST routes for fetching, validating, persisting and listing
//! pipeline graphs. This crate contains the server framework, API schema
//! types, error handling, and route definitions; the graph model,
//! validation rules and storage backends live in their own crates.

pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
