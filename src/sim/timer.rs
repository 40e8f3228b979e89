//! Tick-counted interval timer
//!
//! Durations are converted to whole ticks once, at construction. After that
//! the timer never looks at a clock, so behaviour is stable under frame-rate
//! variance as long as the tick rate is constant for the session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    elapsed_ticks: u32,
    target_ticks: u32,
}

impl Timer {
    /// Build a timer for `duration` at `ticks_per_second`.
    ///
    /// The target is `floor(duration_ms * tps / 1000)`.
    pub fn new(duration: Duration, ticks_per_second: u32) -> Self {
        let ticks = duration.as_millis() as u64 * ticks_per_second as u64 / 1000;
        Self::from_ticks(ticks.min(u32::MAX as u64) as u32)
    }

    pub fn from_ticks(target_ticks: u32) -> Self {
        Self {
            elapsed_ticks: 0,
            target_ticks,
        }
    }

    /// Advance one tick. Saturates at the target.
    #[inline]
    pub fn update(&mut self) {
        if self.elapsed_ticks < self.target_ticks {
            self.elapsed_ticks += 1;
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.elapsed_ticks >= self.target_ticks
    }

    /// Re-arm the timer.
    #[inline]
    pub fn reset(&mut self) {
        self.elapsed_ticks = 0;
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    pub fn target_ticks(&self) -> u32 {
        self.target_ticks
    }

    /// Fraction of the interval that has elapsed, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.target_ticks == 0 {
            1.0
        } else {
            self.elapsed_ticks as f32 / self.target_ticks as f32
        }
    }
}
