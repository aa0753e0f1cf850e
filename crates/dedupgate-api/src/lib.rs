//! Dedupgate HTTP API.
//!
//! Thin transport over the ingestion coordinator: request parsing and
//! validation, outcome-to-status mapping, and process configuration.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
