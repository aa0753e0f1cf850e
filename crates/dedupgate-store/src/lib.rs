//! Storage adapters for the dedupgate ingestion gateway.
//!
//! [`pg_storage::PgStorageAdapter`] is the durable backend; it relies on the
//! ledger's primary key and `ON CONFLICT DO NOTHING` for atomic dedup.
//! [`memory::InMemoryStorageAdapter`] gives the same guarantees inside one
//! process and is used for local runs and tests.

pub mod memory;
pub mod pg_storage;
mod queries;
