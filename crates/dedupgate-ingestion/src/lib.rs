//! Dedupgate — ingestion coordinator.
//!
//! Turns validated event submissions into exactly-once ledger writes and
//! serves the read-side aggregates. The coordinator is stateless: every
//! decision about duplicates is delegated to the storage adapter's atomic
//! conditional insert.

pub mod application;
pub mod domain;
