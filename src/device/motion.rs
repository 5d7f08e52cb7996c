//! Motion states and per-tick outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accuracy radius a device reports, in meters
pub const MIN_ACCURACY_METERS: f64 = 2.0;

/// Highest accuracy radius a device reports, in meters
pub const MAX_ACCURACY_METERS: f64 = 4.5;

/// Largest accuracy change per tick, in meters
pub const ACCURACY_STEP_METERS: f64 = 0.10;

/// Where a device is in its random walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionState {
    /// Standing at its current target
    IdleAtTarget,
    /// Walking toward its current target
    EnRoute,
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionState::IdleAtTarget => write!(f, "Idle"),
            MotionState::EnRoute => write!(f, "En route"),
        }
    }
}

/// What one call to `auto_move` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Idle and stayed idle
    Stayed,
    /// Idle, picked a new target and set off (position unchanged this tick)
    Departed,
    /// Walked part of the way to the target
    Advanced,
    /// Reached the target and snapped onto it
    Arrived,
}
