//! Configuration structures for the venue simulator
//!
//! This module contains the simulation configuration structure and validation logic
//! used to control the venue, the device fleet, the run length, and the reporting
//! endpoints.

use crate::geo::{GeoError, Polygon};
use clap::Parser;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Reporting and motion constants shared by the device model
pub mod defaults {
    /// Simulated milliseconds between two driver steps
    pub const STEP_INTERVAL_MS: u64 = 20_000;

    /// Real milliseconds slept between two driver steps
    pub const STEP_DELAY_MS: u64 = 10;

    /// Number of driver steps in a run
    pub const STEPS: usize = 6_000;

    /// A batch is flushed once it holds more than this many samples
    pub const BATCH_THRESHOLD: usize = 20;

    /// An idle device emits a presence sample after this much silence
    pub const HEARTBEAT_INTERVAL_MS: u64 = 30_000;

    /// How far back the clock starts when the venue has no history
    pub const LOOKBACK_MINUTES: u64 = 100;

    /// Per-request HTTP timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "venue-position-faker",
    version = "0.1.0",
    about = "Venue Position Faker - Simulates indoor-positioning devices and reports their positions",
    long_about = "Simulates a fleet of indoor-positioning devices wandering a venue polygon and reports batched position samples to an ingestion service using per-device bearer tokens.

EXAMPLES:
    # Run with default settings against a local ingestion service
    venue-position-faker

    # Use a venue configuration file
    venue-position-faker --config venue.json

    # Override specific settings
    venue-position-faker --total-devices 200 --steps 1000

    # Generate configuration template
    venue-position-faker --print-config > my-venue.json

    # Validate configuration without running
    venue-position-faker --config my-venue.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON venue configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Venue identifier
    #[arg(long, help = "Venue identifier reported with every sample")]
    pub venue: Option<String>,

    /// Number of devices to simulate
    #[arg(
        long,
        help = "Number of devices to simulate",
        long_help = "Target fleet size. Missing devices are provisioned in the registry. Must be greater than 0. Default: 50"
    )]
    pub total_devices: Option<usize>,

    /// Number of simulation steps
    #[arg(long, help = "Number of simulation steps to run")]
    pub steps: Option<usize>,

    /// Simulated milliseconds per step
    #[arg(long, help = "Simulated milliseconds per step")]
    pub step_interval_ms: Option<u64>,

    /// Real milliseconds slept between steps
    #[arg(long, help = "Real-time delay between steps in milliseconds")]
    pub step_delay_ms: Option<u64>,

    /// Base URL of the ingestion API
    #[arg(long, help = "Base URL of the token and ingestion endpoints")]
    pub api_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, help = "HTTP request timeout in seconds")]
    pub request_timeout_secs: Option<u64>,

    /// Batch size that triggers a flush
    #[arg(long, help = "Flush a device batch once it holds more than this many samples")]
    pub batch_threshold: Option<usize>,

    /// Path of the JSON device registry
    #[arg(
        long,
        help = "Path of the JSON device registry",
        long_help = "Path of the JSON file holding device records and the last reported sample time. When omitted an in-memory registry is used and nothing persists between runs."
    )]
    pub registry: Option<String>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, help = "Directory for rolling log files")]
    pub log_dir: Option<String>,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
///
/// The camelCase aliases accept venue files written for the older faker tooling.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Venue identifier
    pub venue: Option<String>,

    /// Venue boundary ring as `[lon, lat]` pairs
    #[serde(alias = "boundingBox")]
    pub boundary: Option<Vec<[f64; 2]>>,

    /// Floor index range `[low, high)`
    #[serde(alias = "floorBounds")]
    pub floor_bounds: Option<[i32; 2]>,

    /// Target fleet size
    #[serde(alias = "totalDevices")]
    pub total_devices: Option<usize>,

    /// Number of simulation steps
    pub steps: Option<usize>,

    /// Simulated milliseconds per step
    pub step_interval_ms: Option<u64>,

    /// Real milliseconds slept between steps
    pub step_delay_ms: Option<u64>,

    /// Base URL of the ingestion API
    pub api_base_url: Option<String>,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,

    /// Batch size that triggers a flush
    pub batch_threshold: Option<usize>,

    /// Idle heartbeat interval in simulated milliseconds
    pub heartbeat_interval_ms: Option<u64>,

    /// Lookback used when the venue has no history
    pub default_lookback_minutes: Option<u64>,

    /// Path of the JSON device registry
    pub registry_path: Option<String>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,
}

/// Configuration for the venue simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Venue identifier reported with every sample
    pub venue: String,

    /// Venue boundary ring as `[lon, lat]` pairs
    pub boundary: Vec<[f64; 2]>,

    /// Floor index range `[low, high)`; a device keeps one floor for its lifetime
    pub floor_bounds: [i32; 2],

    /// Target fleet size
    pub total_devices: usize,

    /// Number of simulation steps
    pub steps: usize,

    /// Simulated milliseconds per step
    pub step_interval_ms: u64,

    /// Real milliseconds slept between steps
    pub step_delay_ms: u64,

    /// Base URL of the token and ingestion endpoints
    pub api_base_url: String,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// A batch is flushed once it holds more than this many samples
    pub batch_threshold: usize,

    /// Idle heartbeat interval in simulated milliseconds
    pub heartbeat_interval_ms: u64,

    /// Lookback used when the venue has no history
    pub default_lookback_minutes: u64,

    /// Path of the JSON device registry (in-memory when absent)
    pub registry_path: Option<String>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Venue identifier is empty
    #[error("Venue identifier must not be empty")]
    EmptyVenue,

    /// Boundary is not a usable polygon
    #[error("Invalid venue boundary: {0}")]
    InvalidBoundary(#[from] GeoError),

    /// Floor range is inverted
    #[error("Invalid floor range: low ({0}) must be <= high ({1})")]
    InvalidFloorRange(i32, i32),

    /// Device count is invalid
    #[error("Device count must be greater than 0, got {0}")]
    InvalidDeviceCount(usize),

    /// Step count is invalid
    #[error("Step count must be greater than 0, got {0}")]
    InvalidStepCount(usize),

    /// A duration or size setting is zero
    #[error("{field} must be greater than 0")]
    ZeroValue {
        /// Name of the offending field
        field: String,
    },

    /// A duration does not fit the simulated millisecond clock
    #[error("{field} is too large")]
    TooLarge {
        /// Name of the offending field
        field: String,
    },

    /// API base URL is unusable
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidApiUrl {
        /// The configured URL
        url: String,
        /// Why it was rejected
        reason: String,
    },
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            venue: "demo-venue".to_string(),
            boundary: vec![
                [-79.3871, 43.6426],
                [-79.3855, 43.6426],
                [-79.3855, 43.6437],
                [-79.3863, 43.6441],
                [-79.3871, 43.6437],
                [-79.3871, 43.6426],
            ],
            floor_bounds: [1, 4],
            total_devices: 50,
            steps: defaults::STEPS,
            step_interval_ms: defaults::STEP_INTERVAL_MS,
            step_delay_ms: defaults::STEP_DELAY_MS,
            api_base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            batch_threshold: defaults::BATCH_THRESHOLD,
            heartbeat_interval_ms: defaults::HEARTBEAT_INTERVAL_MS,
            default_lookback_minutes: defaults::LOOKBACK_MINUTES,
            registry_path: None,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config = Self::default();

        // Load from config file if specified
        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // Override with command line arguments (CLI takes precedence)
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            venue: config_file.venue.unwrap_or(defaults.venue),
            boundary: config_file.boundary.unwrap_or(defaults.boundary),
            floor_bounds: config_file.floor_bounds.unwrap_or(defaults.floor_bounds),
            total_devices: config_file.total_devices.unwrap_or(defaults.total_devices),
            steps: config_file.steps.unwrap_or(defaults.steps),
            step_interval_ms: config_file.step_interval_ms.unwrap_or(defaults.step_interval_ms),
            step_delay_ms: config_file.step_delay_ms.unwrap_or(defaults.step_delay_ms),
            api_base_url: config_file.api_base_url.unwrap_or(defaults.api_base_url),
            request_timeout_secs: config_file
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
            batch_threshold: config_file.batch_threshold.unwrap_or(defaults.batch_threshold),
            heartbeat_interval_ms: config_file
                .heartbeat_interval_ms
                .unwrap_or(defaults.heartbeat_interval_ms),
            default_lookback_minutes: config_file
                .default_lookback_minutes
                .unwrap_or(defaults.default_lookback_minutes),
            registry_path: config_file.registry_path.or(defaults.registry_path),
            seed: config_file.seed.or(defaults.seed),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.venue {
            config.venue = value;
        }
        if let Some(value) = args.total_devices {
            config.total_devices = value;
        }
        if let Some(value) = args.steps {
            config.steps = value;
        }
        if let Some(value) = args.step_interval_ms {
            config.step_interval_ms = value;
        }
        if let Some(value) = args.step_delay_ms {
            config.step_delay_ms = value;
        }
        if let Some(value) = args.api_url {
            config.api_base_url = value;
        }
        if let Some(value) = args.request_timeout_secs {
            config.request_timeout_secs = value;
        }
        if let Some(value) = args.batch_threshold {
            config.batch_threshold = value;
        }
        if let Some(value) = args.registry {
            config.registry_path = Some(value);
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.venue.trim().is_empty() {
            return Err(ConfigValidationError::EmptyVenue);
        }

        self.venue_area()?;

        if self.floor_bounds[0] > self.floor_bounds[1] {
            return Err(ConfigValidationError::InvalidFloorRange(
                self.floor_bounds[0],
                self.floor_bounds[1],
            ));
        }

        if self.total_devices == 0 {
            return Err(ConfigValidationError::InvalidDeviceCount(self.total_devices));
        }

        if self.steps == 0 {
            return Err(ConfigValidationError::InvalidStepCount(self.steps));
        }

        self.validate_non_zero("step_interval_ms", self.step_interval_ms)?;
        self.validate_non_zero("request_timeout_secs", self.request_timeout_secs)?;
        self.validate_non_zero("batch_threshold", self.batch_threshold as u64)?;
        self.validate_non_zero("heartbeat_interval_ms", self.heartbeat_interval_ms)?;

        self.step_interval_millis()?;
        self.heartbeat_millis()?;
        self.lookback_millis()?;
        self.simulated_span_millis()?;

        self.api_url()?;

        Ok(())
    }

    /// Helper method to reject zero durations and sizes
    fn validate_non_zero(&self, field: &str, value: u64) -> Result<(), ConfigValidationError> {
        if value == 0 {
            return Err(ConfigValidationError::ZeroValue { field: field.to_string() });
        }
        Ok(())
    }

    /// Step increment of the simulated clock in milliseconds
    pub fn step_interval_millis(&self) -> Result<i64, ConfigValidationError> {
        to_millis("step_interval_ms", Some(self.step_interval_ms))
    }

    /// Heartbeat interval in milliseconds
    pub fn heartbeat_millis(&self) -> Result<i64, ConfigValidationError> {
        to_millis("heartbeat_interval_ms", Some(self.heartbeat_interval_ms))
    }

    /// Default lookback in milliseconds
    pub fn lookback_millis(&self) -> Result<i64, ConfigValidationError> {
        to_millis(
            "default_lookback_minutes",
            self.default_lookback_minutes.checked_mul(60_000),
        )
    }

    /// Simulated time covered by the whole run, in milliseconds
    pub fn simulated_span_millis(&self) -> Result<i64, ConfigValidationError> {
        let span = u64::try_from(self.steps)
            .ok()
            .and_then(|steps| steps.checked_mul(self.step_interval_ms));
        to_millis("steps", span)
    }

    /// Build the venue polygon from the configured boundary
    pub fn venue_area(&self) -> Result<Polygon, ConfigValidationError> {
        Ok(Polygon::new(self.boundary.clone())?)
    }

    /// Parse the API base URL, requiring an http(s) scheme
    pub fn api_url(&self) -> Result<Url, ConfigValidationError> {
        let url = Url::parse(&self.api_base_url).map_err(|e| ConfigValidationError::InvalidApiUrl {
            url: self.api_base_url.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigValidationError::InvalidApiUrl {
                url: self.api_base_url.clone(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    /// HTTP request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Real-time pause between steps as a `Duration`
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Default lookback in milliseconds, as a negative clock offset
    pub fn default_time_offset_millis(&self) -> i64 {
        -self.lookback_millis().unwrap_or(i64::MAX)
    }
}

/// Last millisecond of the year 9999
const MAX_EPOCH_MILLIS: i64 = 253_402_300_799_999;

/// Millisecond values must leave room for the epoch-based clock to advance
fn to_millis(field: &str, value: Option<u64>) -> Result<i64, ConfigValidationError> {
    value
        .and_then(|millis| i64::try_from(millis).ok())
        .filter(|millis| millis.checked_add(MAX_EPOCH_MILLIS).is_some())
        .ok_or_else(|| ConfigValidationError::TooLarge { field: field.to_string() })
}
