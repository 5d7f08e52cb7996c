//! Main simulation driver
//!
//! The driver provisions the fleet, then runs a fixed number of discrete steps.
//! Each step moves every device into its own Tokio task, ticks them all
//! concurrently, and waits for every tick (including any flush it triggers)
//! before the clock advances again.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::device::{device_rng, DeviceProfile, DeviceSettings, SimulatedDevice};
use crate::geo::Polygon;
use crate::registry::{provision_devices, DeviceRegistry};
use crate::reporting::{HttpIngestClient, IngestApi};
use crate::simulation::{
    resume_offset_millis, RunStatistics, SimulationClock, SimulationError, SimulationResult,
};
use crate::types::SimulationConfig;

/// Steps between two progress lines at INFO level
const PROGRESS_EVERY: usize = 100;

/// Lifecycle of a driver; a driver runs at most once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Created, not yet running
    NotStarted,
    /// Inside `run`
    Running,
    /// `run` has returned
    Finished,
}

/// Owns the fleet and the simulated clock
pub struct SimulationDriver {
    config: SimulationConfig,
    area: Arc<Polygon>,
    api: Arc<dyn IngestApi>,
    registry: Arc<dyn DeviceRegistry>,
    state: DriverState,
    clock: SimulationClock,
    devices: Vec<SimulatedDevice>,
    statistics: RunStatistics,
}

impl fmt::Debug for SimulationDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationDriver")
            .field("venue", &self.config.venue)
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("devices", &self.devices.len())
            .finish_non_exhaustive()
    }
}

impl SimulationDriver {
    /// Create a driver; the configuration is validated here
    #[instrument(skip_all, fields(venue = %config.venue, total_devices = config.total_devices))]
    pub fn new(
        config: SimulationConfig,
        api: Arc<dyn IngestApi>,
        registry: Arc<dyn DeviceRegistry>,
    ) -> SimulationResult<Self> {
        config.validate()?;
        let area = Arc::new(Polygon::new(config.boundary.clone())?);
        let clock = SimulationClock::starting_now(config.step_interval_millis()?);

        info!(
            "Initializing simulation driver for venue {} with {} devices over {} steps",
            config.venue, config.total_devices, config.steps
        );

        Ok(Self {
            config,
            area,
            api,
            registry,
            state: DriverState::NotStarted,
            clock,
            devices: Vec::new(),
            statistics: RunStatistics::default(),
        })
    }

    /// Create a driver that reports to the configured HTTP API
    pub fn over_http(
        config: SimulationConfig,
        registry: Arc<dyn DeviceRegistry>,
    ) -> SimulationResult<Self> {
        let api = HttpIngestClient::new(config.api_url()?, config.request_timeout())?;
        Self::new(config, Arc::new(api), registry)
    }

    /// Current lifecycle state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The fleet, in provisioning order
    pub fn devices(&self) -> &[SimulatedDevice] {
        &self.devices
    }

    /// The simulated clock
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Resolve the fleet and place every device in the venue.
    ///
    /// Registry failures are fatal. Calling this twice is an error.
    pub async fn provision(&mut self) -> SimulationResult<usize> {
        if self.state != DriverState::NotStarted || !self.devices.is_empty() {
            return Err(SimulationError::invalid_state("devices are already provisioned"));
        }

        let venue = self.config.venue.clone();

        let mut rng = match self.config.seed {
            Some(seed) => {
                info!("Using deterministic seed: {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => {
                debug!("Using entropy-based random seed");
                StdRng::from_entropy()
            }
        };

        let records =
            provision_devices(self.registry.as_ref(), &venue, self.config.total_devices, &mut rng)
                .await?;

        let latest = self.registry.latest_sample_time(&venue).await?;
        let run_offset = resume_offset_millis(
            latest,
            self.clock.start_ms(),
            self.config.default_time_offset_millis(),
        );
        info!(run_offset_ms = run_offset, history = latest.is_some(), "Computed clock offset");

        let settings = DeviceSettings::from_config(&self.config);
        let devices = records
            .into_iter()
            .map(|record| {
                let mut device_rng = device_rng(self.config.seed, &record.id);
                let profile =
                    DeviceProfile::generate(&mut device_rng, self.config.floor_bounds, run_offset);
                SimulatedDevice::new(
                    record.id,
                    venue.clone(),
                    Arc::clone(&self.area),
                    profile,
                    settings,
                    self.clock.current_ms(),
                    device_rng,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.devices = devices;

        self.statistics = RunStatistics::new(self.devices.len());
        info!("Provisioned {} devices for venue {}", self.devices.len(), venue);
        Ok(self.devices.len())
    }

    /// Run the configured number of steps.
    ///
    /// Provisions first if [`provision`](Self::provision) has not been called.
    /// The shutdown flag is checked between steps; in-flight ticks always finish.
    pub async fn run(&mut self, shutdown: watch::Receiver<bool>) -> SimulationResult<RunStatistics> {
        if self.state != DriverState::NotStarted {
            return Err(SimulationError::invalid_state("the simulation has already run"));
        }
        if self.devices.is_empty() {
            self.provision().await?;
        }

        self.state = DriverState::Running;
        let started = Instant::now();
        crate::sim_event!(
            info,
            "Simulation started",
            venue = self.config.venue.as_str(),
            devices = self.devices.len(),
            steps = self.config.steps,
        );

        for step in 1..=self.config.steps {
            if *shutdown.borrow() {
                warn!("Shutdown requested, stopping after {} steps", step - 1);
                break;
            }

            let step_started = Instant::now();
            let now = self.clock.advance();
            self.step(step, now).instrument(crate::step_span!(step, clock_ms = now)).await;
            self.statistics.steps_completed = step;

            debug!(step, elapsed_ms = step_started.elapsed().as_millis() as u64, "Step complete");
            if step % PROGRESS_EVERY == 0 {
                info!("Completed {}/{} steps", step, self.config.steps);
            }

            if self.devices.is_empty() {
                error!("Every device has been retired, stopping");
                break;
            }

            if self.config.step_delay_ms > 0 {
                tokio::time::sleep(self.config.step_delay()).await;
            }
        }

        self.finish(started).await;
        Ok(self.statistics.clone())
    }

    /// Tick every device concurrently and wait for all of them
    async fn step(&mut self, step: usize, now: i64) {
        let mut tasks = JoinSet::new();

        for (index, mut device) in std::mem::take(&mut self.devices).into_iter().enumerate() {
            let api = Arc::clone(&self.api);
            tasks.spawn(
                async move {
                    let report = device.tick(now, api.as_ref()).await;
                    (index, device, report)
                }
                .in_current_span(),
            );
        }

        let mut returned = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, device, report)) => {
                    self.statistics.record_tick(&report);
                    returned.push((index, device));
                }
                Err(e) => {
                    error!(step, error = %e, "Device task failed, retiring device");
                    self.statistics.devices_retired += 1;
                }
            }
        }

        returned.sort_by_key(|(index, _)| *index);
        self.devices = returned.into_iter().map(|(_, device)| device).collect();
    }

    async fn finish(&mut self, started: Instant) {
        self.state = DriverState::Finished;
        self.statistics.duration = started.elapsed();
        self.statistics.samples_pending = self.devices.iter().map(|d| d.batch().len()).sum();

        let latest = self.devices.iter().filter_map(|d| d.last_sample_time()).max();
        if let Some(latest) = latest {
            if let Err(e) = self.registry.record_sample_time(&self.config.venue, latest).await {
                warn!(error = %e, "Failed to record latest sample time");
            }
        }

        crate::sim_event!(
            info,
            "Simulation finished",
            venue = self.config.venue.as_str(),
            steps = self.statistics.steps_completed,
            duration_ms = self.statistics.duration.as_millis() as u64,
        );
        info!("{}", self.statistics.summary());
    }
}
