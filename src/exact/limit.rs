//! Wall-clock budget for the exact search.
//!
//! The clock is only read every `clock_check_mask + 1` steps; the default
//! mask (`0x3FF`) checks roughly every thousand search nodes. The clock
//! starts when the limit is created and is never reset.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimit {
    clock_check_mask: u64,
    steps: u64,
    time_limit: Duration,
    start_time: Instant,
}

impl TimeLimit {
    const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x3FF;

    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_STEP_CLOCK_CHECK_MASK)
    }

    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            clock_check_mask,
            steps: 0,
            time_limit,
            start_time: Instant::now(),
        }
    }

    #[inline(always)]
    pub fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
    }

    /// Returns `true` once the budget is spent, checked at mask boundaries.
    #[inline(always)]
    pub fn is_expired(&self) -> bool {
        (self.steps & self.clock_check_mask) == 0 && self.start_time.elapsed() >= self.time_limit
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}
