//! Error types and handling
//!
//! This module contains error types and error handling for the simulation.

use thiserror::Error;

use crate::geo::GeoError;
use crate::registry::RegistryError;
use crate::reporting::ReportError;
use crate::types::ConfigValidationError;

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration loading or validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(String),

    /// Venue geometry is unusable
    #[error("Venue geometry error: {0}")]
    GeometryError(#[from] GeoError),

    /// The device registry failed
    #[error("Device registry error: {0}")]
    RegistryError(#[from] RegistryError),

    /// The reporting client could not be set up
    #[error("Reporting client error: {0}")]
    ReportingError(#[from] ReportError),

    /// An operation was attempted in the wrong driver state
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),
}

impl From<ConfigValidationError> for SimulationError {
    fn from(error: ConfigValidationError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl SimulationError {
    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::ConfigurationError(_) => false,
            SimulationError::GeometryError(_) => false,
            SimulationError::RegistryError(_) => true,
            SimulationError::ReportingError(_) => false,
            SimulationError::InvalidState(_) => false,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::GeometryError(_) => "Geometry",
            SimulationError::RegistryError(_) => "Registry",
            SimulationError::ReportingError(_) => "Reporting",
            SimulationError::InvalidState(_) => "State",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
