//! Core types and configuration for the venue simulator
//!
//! # Overview
//!
//! - **Identifiers**: device identities, opaque strings from the registry
//! - **Enums**: cosmetic registry metadata (device model, role)
//! - **Configuration**: simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use venue_position_faker::types::*;
//!
//! let device_id = DeviceId::new();
//! let model = DeviceModel::IPhone11Pro;
//! assert_eq!(model.to_string(), "iPhone 11 Pro");
//!
//! let config = SimulationConfig {
//!     total_devices: 25,
//!     steps: 100,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! # let _ = device_id;
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
