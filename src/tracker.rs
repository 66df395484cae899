//! Session-local daily intake accounting.
//!
//! Shell-side state, deliberately outside the estimation core: the predictor
//! never touches a tracker. Totals live for the process only; persisting
//! daily logs across sessions is out of scope.

use std::sync::atomic::{AtomicU64, Ordering};

/// Cumulative caloric intake against a daily goal.
///
/// Accumulation is lock-free: concurrent `add` calls from multiple request
/// threads lose no updates. The running total is kept in `f64` so long
/// sessions of small additions don't degrade.
///
/// # Examples
///
/// ```
/// use kalori::tracker::DailyTracker;
///
/// let tracker = DailyTracker::new(2000.0);
/// tracker.add(450.0);
/// tracker.add(120.5);
///
/// assert!((tracker.consumed() - 570.5).abs() < 1e-9);
/// assert!((tracker.remaining() - 1429.5).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct DailyTracker {
    /// Daily goal (kcal).
    goal: f32,
    /// Running total, stored as `f64` bits for atomic compare-exchange.
    consumed_bits: AtomicU64,
}

impl DailyTracker {
    /// Creates a tracker with the given daily goal in kcal.
    #[must_use]
    pub fn new(goal: f32) -> Self {
        Self {
            goal,
            consumed_bits: AtomicU64::new(0.0f64.to_bits()),
        }
    }

    /// The daily goal (kcal).
    #[must_use]
    pub fn goal(&self) -> f32 {
        self.goal
    }

    /// Total intake recorded so far (kcal).
    #[must_use]
    pub fn consumed(&self) -> f64 {
        f64::from_bits(self.consumed_bits.load(Ordering::Acquire))
    }

    /// Records one food item's calories and returns the new total.
    pub fn add(&self, kcal: f32) -> f64 {
        let mut current = self.consumed_bits.load(Ordering::Acquire);
        loop {
            let next = f64::from_bits(current) + f64::from(kcal);
            match self.consumed_bits.compare_exchange_weak(
                current,
                next.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }

    /// Calories left before the goal is reached; negative once surpassed.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        f64::from(self.goal) - self.consumed()
    }

    /// Fraction of the goal consumed, clamped to `0..=1` — the value behind
    /// a progress display.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.goal <= 0.0 {
            return 1.0;
        }
        (self.consumed() / f64::from(self.goal)).clamp(0.0, 1.0)
    }

    /// Clears the running total.
    pub fn reset(&self) {
        self.consumed_bits
            .store(0.0f64.to_bits(), Ordering::Release);
    }
}
