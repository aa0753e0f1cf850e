//! Dedupgate Core — shared domain abstractions.
//!
//! This crate defines the event record, the dedup key, the error taxonomy
//! and the storage contract that every backing store must satisfy. It
//! contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod storage;
