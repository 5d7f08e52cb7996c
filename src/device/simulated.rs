//! A single simulated device: random walk, sample buffering, flushing

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use super::{
    DeviceProfile, MotionState, MoveOutcome, ACCURACY_STEP_METERS, MAX_ACCURACY_METERS,
    MIN_ACCURACY_METERS,
};
use crate::geo::{
    bearing_degrees, distance_meters, points_equal, translate, GeoResult, Point, Polygon,
};
use crate::reporting::{DeviceReporter, FlushReport, IngestApi, PositionSample};
use crate::types::{defaults, DeviceId, SimulationConfig};

/// Golden-ratio multiplier used to spread device fingerprints over the seed space
const SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// Build the RNG for one device.
///
/// With a run seed the stream depends only on `(seed, device)`, so a device
/// behaves the same regardless of fleet order.
pub fn device_rng(seed: Option<u64>, device: &DeviceId) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ device.fingerprint().wrapping_mul(SEED_MIX)),
        None => StdRng::from_entropy(),
    }
}

/// Buffering policy shared by every device of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSettings {
    /// Flush once the batch holds more than this many samples
    pub batch_threshold: usize,
    /// Idle devices emit a sample after this much simulated silence
    pub heartbeat_interval_ms: i64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            batch_threshold: defaults::BATCH_THRESHOLD,
            heartbeat_interval_ms: defaults::HEARTBEAT_INTERVAL_MS as i64,
        }
    }
}

impl DeviceSettings {
    /// Settings taken from the run configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            batch_threshold: config.batch_threshold,
            heartbeat_interval_ms: config.heartbeat_millis().unwrap_or(i64::MAX),
        }
    }
}

/// What one tick did to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Result of the motion step
    pub movement: MoveOutcome,
    /// Whether a sample was buffered
    pub pushed: bool,
    /// Flush result, when the tick triggered one
    pub flush: Option<FlushReport>,
}

/// One device wandering the venue
///
/// Generic over the RNG so tests can script the random draws.
#[derive(Debug)]
pub struct SimulatedDevice<R = StdRng> {
    id: DeviceId,
    venue: String,
    area: Arc<Polygon>,
    profile: DeviceProfile,
    settings: DeviceSettings,

    position: Point,
    previous_position: Point,
    target: Point,
    bearing: f64,
    accuracy: f64,
    state: MotionState,

    clock_ms: i64,
    batch: Vec<PositionSample>,
    last_push_ms: i64,
    last_sample_time: Option<i64>,

    reporter: DeviceReporter,
    rng: R,
}

impl<R: Rng> SimulatedDevice<R> {
    /// Place a device at a uniformly sampled point of `area` and buffer its first sample
    ///
    /// Fails only when the area cannot be sampled.
    pub fn new(
        id: DeviceId,
        venue: impl Into<String>,
        area: Arc<Polygon>,
        profile: DeviceProfile,
        settings: DeviceSettings,
        start_ms: i64,
        mut rng: R,
    ) -> GeoResult<Self> {
        let position = area.sample_uniform(&mut rng)?;
        let reporter = DeviceReporter::new(id.clone());

        let mut device = Self {
            id,
            venue: venue.into(),
            area,
            profile,
            settings,
            position,
            previous_position: position,
            target: position,
            bearing: 0.0,
            accuracy: profile.initial_accuracy,
            state: MotionState::IdleAtTarget,
            clock_ms: start_ms,
            batch: Vec::new(),
            last_push_ms: start_ms,
            last_sample_time: None,
            reporter,
            rng,
        };
        device.push_sample();
        Ok(device)
    }

    /// Device identity
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// Venue the device belongs to
    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Fixed characteristics
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Current location
    pub fn position(&self) -> Point {
        self.position
    }

    /// Location before the last move
    pub fn previous_position(&self) -> Point {
        self.previous_position
    }

    /// Current walk target
    pub fn target(&self) -> Point {
        self.target
    }

    /// Heading toward the target, in degrees
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    /// Current accuracy radius in meters
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Current motion state
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Simulated clock of the last tick, epoch milliseconds
    pub fn clock_ms(&self) -> i64 {
        self.clock_ms
    }

    /// Samples waiting for the next flush
    pub fn batch(&self) -> &[PositionSample] {
        &self.batch
    }

    /// Simulated clock of the last buffered sample
    pub fn last_push_ms(&self) -> i64 {
        self.last_push_ms
    }

    /// Timestamp of the most recent sample this device produced
    pub fn last_sample_time(&self) -> Option<i64> {
        self.last_sample_time
    }

    /// Reporter holding the token cache
    pub fn reporter_mut(&mut self) -> &mut DeviceReporter {
        &mut self.reporter
    }

    fn push_sample(&mut self) {
        let time = self.clock_ms + self.profile.time_offset_ms;
        self.batch.push(PositionSample {
            acc: self.accuracy,
            device: self.id.clone(),
            floor: self.profile.floor,
            lonlat: self.position.lon_lat(),
            time,
            user_consent: true,
            venue: self.venue.clone(),
        });
        self.last_push_ms = self.clock_ms;
        self.last_sample_time = Some(time);
    }

    /// Advance the random walk by `elapsed_ms` of simulated time
    pub fn auto_move(&mut self, elapsed_ms: i64) -> MoveOutcome {
        let target_distance = distance_meters(&self.position, &self.target);

        let drift = self.rng.gen_range(-ACCURACY_STEP_METERS..ACCURACY_STEP_METERS);
        self.accuracy = (self.accuracy + drift).clamp(MIN_ACCURACY_METERS, MAX_ACCURACY_METERS);

        let distance_traveled = self.profile.speed_mps * elapsed_ms.max(0) as f64 / 1000.0;

        match self.state {
            MotionState::IdleAtTarget => {
                let draw: f64 = self.rng.gen();
                if draw <= self.profile.stillness {
                    return MoveOutcome::Stayed;
                }

                let target = match self.area.sample_uniform(&mut self.rng) {
                    Ok(target) => target,
                    Err(e) => {
                        let reason = e.to_string();
                        crate::device_event!(
                            warn,
                            "Could not pick a new target, staying put",
                            device = self.id.as_str(),
                            venue = self.venue.as_str(),
                            time = self.clock_ms,
                            error = reason.as_str(),
                        );
                        return MoveOutcome::Stayed;
                    }
                };
                if points_equal(&target, &self.position) {
                    return MoveOutcome::Stayed;
                }

                self.target = target;
                self.bearing = bearing_degrees(&self.position, &target);
                self.state = MotionState::EnRoute;
                crate::device_event!(
                    debug,
                    "Departing toward new target",
                    device = self.id.as_str(),
                    venue = self.venue.as_str(),
                    time = self.clock_ms,
                    bearing = self.bearing,
                    distance = distance_meters(&self.position, &target),
                );
                MoveOutcome::Departed
            }
            MotionState::EnRoute if target_distance <= distance_traveled => {
                self.previous_position = self.position;
                self.position = self.target;
                self.state = MotionState::IdleAtTarget;
                crate::device_event!(
                    debug,
                    "Arrived at target",
                    device = self.id.as_str(),
                    venue = self.venue.as_str(),
                    time = self.clock_ms,
                );
                MoveOutcome::Arrived
            }
            MotionState::EnRoute => {
                self.previous_position = self.position;
                self.position = translate(&self.position, distance_traveled, self.bearing);
                MoveOutcome::Advanced
            }
        }
    }

    /// Set the clock to `now_ms`, move, and buffer a sample if warranted.
    ///
    /// A sample is buffered when the device moved, or when it has been silent
    /// for longer than the heartbeat interval.
    pub fn advance(&mut self, now_ms: i64) -> TickReport {
        let elapsed_ms = now_ms - self.clock_ms;
        self.clock_ms = now_ms;

        let before = self.position;
        let movement = self.auto_move(elapsed_ms);
        let moved = !points_equal(&before, &self.position);

        let pushed = if moved || now_ms - self.last_push_ms > self.settings.heartbeat_interval_ms {
            self.push_sample();
            true
        } else {
            false
        };

        TickReport { movement, pushed, flush: None }
    }

    /// Advance to `now_ms` and flush if the batch has grown past the threshold
    pub async fn tick(&mut self, now_ms: i64, api: &dyn IngestApi) -> TickReport {
        let mut report = self.advance(now_ms);
        if self.batch.len() > self.settings.batch_threshold {
            report.flush = Some(self.flush(api).await);
        }
        report
    }

    /// Hand the whole batch to the reporter; the batch is empty afterwards
    pub async fn flush(&mut self, api: &dyn IngestApi) -> FlushReport {
        let batch = std::mem::take(&mut self.batch);
        crate::device_event!(
            debug,
            "Flushing batch",
            device = self.id.as_str(),
            venue = self.venue.as_str(),
            time = self.clock_ms,
            samples = batch.len(),
        );
        self.reporter.report(api, batch).await
    }
}
