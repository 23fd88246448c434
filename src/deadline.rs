//! Wall-clock deadline shared by all optimization stages of one instance.

use std::time::{Duration, Instant};

/// Stand-in for budgets too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A fixed instant after which optimizers stop and return their best schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    instant: Instant,
}

impl Deadline {
    /// Deadline `budget` from now. Budgets past the clock's range saturate far in the future.
    pub fn after(budget: Duration) -> Self {
        let now = Instant::now();
        let instant = now
            .checked_add(budget)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Deadline { instant }
    }

    pub fn at(instant: Instant) -> Self {
        Deadline { instant }
    }

    /// A deadline that has already passed.
    pub fn expired_now() -> Self {
        Deadline {
            instant: Instant::now(),
        }
    }

    pub fn instant(&self) -> Instant {
        self.instant
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.instant
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.instant.saturating_duration_since(Instant::now())
    }
}
