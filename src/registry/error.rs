//! Registry error types

use thiserror::Error;

use crate::types::DeviceId;

/// Errors raised by registry backends
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Backing file could not be read or written
    #[error("Registry I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file exists but is not a registry document
    #[error("Registry file {path} is corrupt: {source}")]
    Corrupt {
        /// Offending file
        path: String,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// Registry document could not be serialized
    #[error("Failed to serialize registry: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A device with this identity already exists
    #[error("Device {0} is already registered")]
    DuplicateDevice(DeviceId),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
