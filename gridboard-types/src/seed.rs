//! Monotonic seed source for generated identifiers.
//!
//! Seeds follow wall-clock nanoseconds, but never repeat or go backwards
//! within one clock: if the wall clock has not advanced past the last seed,
//! the next seed is the last one plus one.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out strictly increasing `i64` seeds derived from wall time.
#[derive(Debug)]
pub struct SeedClock {
    last: AtomicI64,
}

impl SeedClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(i64::MIN),
        }
    }

    /// Returns the next seed for the given wall time.
    ///
    /// Times outside the nanosecond-representable range (before 1677 or
    /// after 2262) saturate.
    pub fn next(&self, now: DateTime<Utc>) -> i64 {
        let wall = now.timestamp_nanos_opt().unwrap_or(if now.timestamp() < 0 {
            i64::MIN
        } else {
            i64::MAX
        });

        let step = |last: i64| wall.max(last.saturating_add(1));
        match self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(step(last)))
        {
            Ok(prev) | Err(prev) => step(prev),
        }
    }

    /// Returns the next seed for the current wall time.
    pub fn tick(&self) -> i64 {
        self.next(Utc::now())
    }
}

impl Default for SeedClock {
    fn default() -> Self {
        Self::new()
    }
}
