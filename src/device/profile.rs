//! Per-device characteristics fixed at creation

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Walking speed range in meters per second
pub const SPEED_RANGE_MPS: (f64, f64) = (1.2, 1.6);

/// Stillness probability range
pub const STILLNESS_RANGE: (f64, f64) = (0.95, 0.96);

/// Initial accuracy range in meters
pub const INITIAL_ACCURACY_RANGE: (f64, f64) = (2.5, 4.5);

/// Bound of the per-device clock jitter, in milliseconds
pub const CLOCK_JITTER_MS: i64 = 15_000;

/// Characteristics drawn once per device and kept for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Walking speed in meters per second
    pub speed_mps: f64,
    /// Probability of staying put on an idle tick
    pub stillness: f64,
    /// Floor the device lives on
    pub floor: i32,
    /// Offset added to the simulated clock when stamping samples
    pub time_offset_ms: i64,
    /// Accuracy radius of the first sample
    pub initial_accuracy: f64,
}

impl DeviceProfile {
    /// Draw a profile.
    ///
    /// The floor is uniform over `[low, high)`, or `low` when the bounds are
    /// equal. `run_offset_ms` is the run-wide clock offset; each device adds its
    /// own jitter on top of it.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, floor_bounds: [i32; 2], run_offset_ms: i64) -> Self {
        let [low, high] = floor_bounds;
        let floor = if low < high { rng.gen_range(low..high) } else { low };

        Self {
            speed_mps: rng.gen_range(SPEED_RANGE_MPS.0..=SPEED_RANGE_MPS.1),
            stillness: rng.gen_range(STILLNESS_RANGE.0..STILLNESS_RANGE.1),
            floor,
            time_offset_ms: run_offset_ms + rng.gen_range(-CLOCK_JITTER_MS..CLOCK_JITTER_MS),
            initial_accuracy: rng.gen_range(INITIAL_ACCURACY_RANGE.0..INITIAL_ACCURACY_RANGE.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_profiles_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let profile = DeviceProfile::generate(&mut rng, [1, 4], -6_000_000);
            assert!((1.2..=1.6).contains(&profile.speed_mps));
            assert!((0.95..0.96).contains(&profile.stillness));
            assert!((1..4).contains(&profile.floor));
            assert!((2.5..4.5).contains(&profile.initial_accuracy));
            let jitter = profile.time_offset_ms + 6_000_000;
            assert!((-15_000..15_000).contains(&jitter));
        }
    }

    #[test]
    fn test_equal_floor_bounds_pin_the_floor() {
        let mut rng = StdRng::seed_from_u64(5);
        let profile = DeviceProfile::generate(&mut rng, [3, 3], 0);
        assert_eq!(profile.floor, 3);
    }
}
