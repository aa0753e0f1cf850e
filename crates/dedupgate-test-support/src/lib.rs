//! Shared test mocks and utilities for the dedupgate ingestion gateway.

mod clock;
mod event;
mod storage;

pub use clock::{FixedClock, SteppingClock};
pub use event::sample_event;
pub use storage::{FailingStorage, RecordingStorage, StorageCall};
