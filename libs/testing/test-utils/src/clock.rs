//! Deterministic [`Clock`] implementations for tests.

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use std::sync::Mutex;

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    utc_now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Starts at a given instant and moves forward by `step` on every `utc()` read.
///
/// Lets a test observe `updated_at > created_at` without sleeping.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: TimeDelta,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    /// Moves the clock forward without reading it.
    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.next.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.lock_clock();
        let now = *next;
        *next += self.step;
        now
    }
}
