//! Time source for ledger stamps and uptime.
//!
//! Injected rather than read from `Utc::now()` directly so tests can pin
//! `ingested_at` ordering and uptime to known values.

use chrono::{DateTime, TimeDelta, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// The current instant. In-process ledgers stamp `ingested_at` with it.
    fn now(&self) -> DateTime<Utc>;

    /// Time from `since` until now, floored at zero when the clock has
    /// stepped backwards.
    fn elapsed_since(&self, since: DateTime<Utc>) -> TimeDelta {
        (self.now() - since).max(TimeDelta::zero())
    }
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
