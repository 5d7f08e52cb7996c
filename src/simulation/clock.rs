//! Discrete simulation clock
//!
//! The clock starts at wall-clock "now" and advances by a fixed increment per
//! step, independent of how long a step actually takes. Sample timestamps are
//! shifted by an offset so a run continues from where the venue's history left off.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Simulated clock advanced one fixed step at a time
#[derive(Debug, Clone)]
pub struct SimulationClock {
    start_ms: i64,
    current_ms: i64,
    step_ms: i64,
    steps_taken: u64,
}

impl SimulationClock {
    /// A clock starting at `start_ms` (epoch milliseconds) advancing by `step_ms`
    pub fn new(start_ms: i64, step_ms: i64) -> Self {
        Self { start_ms, current_ms: start_ms, step_ms, steps_taken: 0 }
    }

    /// A clock starting at the current wall-clock time
    pub fn starting_now(step_ms: i64) -> Self {
        Self::new(Utc::now().timestamp_millis(), step_ms)
    }

    /// Advance one step and return the new time
    pub fn advance(&mut self) -> i64 {
        self.current_ms = self.current_ms.saturating_add(self.step_ms);
        self.steps_taken += 1;
        self.current_ms
    }

    /// Current simulated time, epoch milliseconds
    pub fn current_ms(&self) -> i64 {
        self.current_ms
    }

    /// Start time, epoch milliseconds
    pub fn start_ms(&self) -> i64 {
        self.start_ms
    }

    /// Steps advanced so far
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Simulated time elapsed since the start
    pub fn elapsed(&self) -> Duration {
        Duration::milliseconds(self.current_ms - self.start_ms)
    }

    /// Current simulated time as a timestamp
    pub fn current_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.current_ms)
    }
}

/// Offset that makes a run continue from the venue's latest recorded sample.
///
/// With history the offset is `latest - now`; without it the clock is pushed
/// back by the default lookback.
pub fn resume_offset_millis(latest_ms: Option<i64>, now_ms: i64, default_offset_ms: i64) -> i64 {
    match latest_ms {
        Some(latest) => {
            debug!(latest_ms = latest, now_ms, "Continuing from recorded history");
            latest - now_ms
        }
        None => default_offset_ms,
    }
}
