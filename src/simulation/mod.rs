//! Simulation driver and control
//!
//! This module contains the simulation driver, the discrete clock, run
//! statistics, logging setup, and error handling.
//!
//! # Overview
//!
//! - **SimulationDriver**: provisions the fleet and runs the step loop
//! - **SimulationClock**: fixed-increment simulated time
//! - **RunStatistics**: counters collected over a run
//! - **LoggingConfig**: tracing subscriber setup
//! - **SimulationError**: errors that abort a run
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use venue_position_faker::registry::InMemoryRegistry;
//! use venue_position_faker::simulation::*;
//! use venue_position_faker::types::*;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SimulationConfig { total_devices: 10, steps: 50, ..Default::default() };
//! let registry = Arc::new(InMemoryRegistry::new());
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let mut driver = SimulationDriver::over_http(config, registry)?;
//! let stats = driver.run(shutdown_rx).await?;
//! println!("{}", stats.summary());
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod driver;
pub mod error;
pub mod logging;
pub mod statistics;

// Re-export all public types for convenience
pub use clock::*;
pub use driver::*;
pub use error::*;
pub use logging::*;
pub use statistics::*;
