//! Venue Position Faker
//!
//! Simulates a population of indoor-positioning devices wandering inside a
//! venue and reports their observed positions to an ingestion service, to
//! generate realistic synthetic telemetry for a downstream positioning pipeline.
//!
//! # Overview
//!
//! Every device performs a random walk over the venue polygon. Position samples
//! are buffered per device and flushed in batches to the ingestion endpoint,
//! authenticated with a per-device bearer token that is cached until it expires.
//!
//! ## Key Features
//!
//! - **Geometry**: polygon containment, uniform sampling, great-circle distance, bearing and translation
//! - **Device Model**: idle/en-route motion state machine with heartbeat samples and size-triggered flushes
//! - **Reporting**: token caching, batched POSTs, failures logged and contained per device
//! - **Driver**: discrete clock, concurrent per-step fan-out, graceful shutdown
//! - **Registry**: device provisioning against an in-memory or JSON-file registry
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use venue_position_faker::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SimulationConfig {
//!     total_devices: 5,
//!     steps: 30,
//!     step_delay_ms: 0,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let api = Arc::new(RecordingIngestApi::new());
//! let registry = Arc::new(InMemoryRegistry::new());
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let mut driver = SimulationDriver::new(config, api.clone(), registry)?;
//! let stats = driver.run(shutdown_rx).await?;
//! assert_eq!(stats.steps_completed, 30);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`geo`]: Geometry utilities
//! - [`types`]: Identifiers, registry metadata enums, and configuration
//! - [`device`]: The simulated device and its motion model
//! - [`reporting`]: Token and ingestion endpoints, and the flush protocol
//! - [`registry`]: Device provisioning backends
//! - [`simulation`]: Driver, clock, statistics, logging, and errors
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │ Simulation  │    │   Device    │    │  Reporting  │
//! │             │    │             │    │             │
//! │ Driver      │───►│ Motion      │───►│ Tokens      │
//! │ Clock       │    │ Batching    │    │ HTTP client │
//! │ Statistics  │    │             │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        │                  │
//!        ▼                  ▼
//! ┌─────────────┐    ┌─────────────┐
//! │  Registry   │    │     Geo     │
//! │             │    │             │
//! │ Provisioning│    │ Polygon     │
//! │ History     │    │ Sphere      │
//! └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod device;
pub mod geo;
pub mod registry;
pub mod reporting;
pub mod simulation;

pub mod types;

// Core types and configuration
pub use types::{
    ConfigError, ConfigValidationError,
    // Identifiers
    DeviceId,
    // Enums
    DeviceModel, DeviceRole,
    // Configuration
    SimulationConfig,
};

// Geometry
pub use geo::{GeoError, Point, Polygon};

// Devices
pub use device::{DeviceProfile, DeviceSettings, MotionState, MoveOutcome, SimulatedDevice, TickReport};

// Reporting
pub use reporting::{
    DeviceReporter, DeviceToken, HttpIngestClient, IngestApi, PositionSample, ReportError,
    ReportOutcome,
};

#[cfg(any(test, feature = "test-helpers"))]
pub use reporting::{RecordedCall, RecordingIngestApi};

// Registry
pub use registry::{DeviceRecord, DeviceRegistry, InMemoryRegistry, JsonFileRegistry, RegistryError};

// Simulation types and functionality
pub use simulation::{
    DriverState, LoggingConfig, RunStatistics, SimulationDriver, SimulationError, SimulationResult,
};
