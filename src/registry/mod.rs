//! Device registry
//!
//! The registry owns device identities and venue metadata that outlive a run.
//! The simulator only needs four operations from it, captured by the
//! [`DeviceRegistry`] trait; two backends are provided:
//!
//! - **InMemoryRegistry**: nothing persists between runs
//! - **JsonFileRegistry**: a single JSON document on disk
//!
//! [`provision_devices`] resolves the fleet for a venue, creating the shortfall.

pub mod error;
pub mod file;
pub mod memory;
pub mod provision;
pub mod record;

pub use error::*;
pub use file::*;
pub use memory::*;
pub use provision::*;
pub use record::*;

use async_trait::async_trait;

/// Persistent store of devices and per-venue sample history
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Up to `limit` devices registered for `venue`, in registration order
    async fn list_devices(&self, venue: &str, limit: usize) -> RegistryResult<Vec<DeviceRecord>>;

    /// Register a new device
    async fn create_device(&self, record: DeviceRecord) -> RegistryResult<DeviceRecord>;

    /// Epoch milliseconds of the most recent sample recorded for `venue`
    async fn latest_sample_time(&self, venue: &str) -> RegistryResult<Option<i64>>;

    /// Remember `millis` as the latest sample time for `venue` (never moves backwards)
    async fn record_sample_time(&self, venue: &str, millis: i64) -> RegistryResult<()>;
}
