//! In-memory registry

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use super::{DeviceRecord, DeviceRegistry, RegistryDocument, RegistryError, RegistryResult};

/// Registry that lives only as long as the process
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    document: Mutex<RegistryDocument>,
}

impl InMemoryRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with `devices`
    pub fn with_devices(devices: Vec<DeviceRecord>) -> Self {
        Self { document: Mutex::new(RegistryDocument { devices, ..Default::default() }) }
    }

    /// Snapshot of everything stored
    pub fn snapshot(&self) -> RegistryDocument {
        self.document().clone()
    }

    fn document(&self) -> MutexGuard<'_, RegistryDocument> {
        self.document.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DeviceRegistry for InMemoryRegistry {
    async fn list_devices(&self, venue: &str, limit: usize) -> RegistryResult<Vec<DeviceRecord>> {
        Ok(self.document().list(venue, limit))
    }

    async fn create_device(&self, record: DeviceRecord) -> RegistryResult<DeviceRecord> {
        self.document().insert(record).map_err(RegistryError::DuplicateDevice)
    }

    async fn latest_sample_time(&self, venue: &str) -> RegistryResult<Option<i64>> {
        Ok(self.document().latest_sample_times.get(venue).copied())
    }

    async fn record_sample_time(&self, venue: &str, millis: i64) -> RegistryResult<()> {
        self.document().record_time(venue, millis);
        Ok(())
    }
}
