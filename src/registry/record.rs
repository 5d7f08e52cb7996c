//! Registry records

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{DeviceId, DeviceModel, DeviceRole};

/// A registered device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Device identity
    pub id: DeviceId,
    /// Venue the device is registered for
    pub venue: String,
    /// Hardware model label
    #[serde(rename = "type")]
    pub device_type: String,
    /// Display name, e.g. "Security iPhone 8"
    pub name: String,
}

impl DeviceRecord {
    /// A fresh record with a UUID identity and a random model and role
    pub fn generate<R: Rng + ?Sized>(venue: impl Into<String>, rng: &mut R) -> Self {
        let model = DeviceModel::random(rng);
        let role = DeviceRole::random(rng);

        Self {
            id: DeviceId::new(),
            venue: venue.into(),
            device_type: model.label().to_string(),
            name: format!("{} {}", role, model),
        }
    }
}

/// Everything a registry backend stores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Registered devices, in registration order
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
    /// Latest sample time per venue, epoch milliseconds
    #[serde(default, rename = "latestSampleTimes")]
    pub latest_sample_times: BTreeMap<String, i64>,
}

impl RegistryDocument {
    pub(crate) fn list(&self, venue: &str, limit: usize) -> Vec<DeviceRecord> {
        self.devices.iter().filter(|d| d.venue == venue).take(limit).cloned().collect()
    }

    pub(crate) fn insert(&mut self, record: DeviceRecord) -> Result<DeviceRecord, DeviceId> {
        if self.devices.iter().any(|d| d.id == record.id) {
            return Err(record.id);
        }
        self.devices.push(record.clone());
        Ok(record)
    }

    pub(crate) fn record_time(&mut self, venue: &str, millis: i64) {
        let entry = self.latest_sample_times.entry(venue.to_string()).or_insert(millis);
        *entry = (*entry).max(millis);
    }
}
