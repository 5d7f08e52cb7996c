//! Simulated indoor-positioning devices
//!
//! Each device performs a random walk over the venue polygon: it idles at a
//! target, occasionally picks a new uniformly sampled target, walks toward it
//! at a fixed speed, and snaps onto it on arrival. Samples are buffered when the
//! device moves or when it has been silent for the heartbeat interval, and the
//! buffer is flushed through the device's reporter once it grows past the
//! batch threshold.
//!
//! # Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use venue_position_faker::device::*;
//! use venue_position_faker::geo::Polygon;
//! use venue_position_faker::types::DeviceId;
//!
//! let area = Arc::new(Polygon::new(vec![[0.0, 0.0], [0.001, 0.0], [0.001, 0.001], [0.0, 0.001]])?);
//! let id = DeviceId::new();
//! let mut rng = device_rng(Some(7), &id);
//! let profile = DeviceProfile::generate(&mut rng, [0, 3], 0);
//!
//! let mut device = SimulatedDevice::new(id, "demo", area, profile, DeviceSettings::default(), 0, rng)?;
//! assert_eq!(device.batch().len(), 1);
//!
//! device.advance(20_000);
//! assert_eq!(device.clock_ms(), 20_000);
//! # Ok::<(), venue_position_faker::geo::GeoError>(())
//! ```

pub mod motion;
pub mod profile;
pub mod simulated;

pub use motion::*;
pub use profile::*;
pub use simulated::*;
