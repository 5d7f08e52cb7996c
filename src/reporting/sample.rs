//! Wire types exchanged with the ingestion endpoint

use serde::{Deserialize, Serialize};

use crate::types::DeviceId;

/// One reported observation of a device
///
/// Serialized as `{acc, device, floor, lonlat, time, userConsent, venue}`
/// where `lonlat` is a `[lon, lat]` pair and `time` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Accuracy radius in meters
    pub acc: f64,
    /// Reporting device
    pub device: DeviceId,
    /// Floor index
    pub floor: i32,
    /// Position as `[lon, lat]`
    pub lonlat: [f64; 2],
    /// Observation time, epoch milliseconds (already skewed by the device offset)
    pub time: i64,
    /// Whether the device owner consented to tracking
    #[serde(rename = "userConsent")]
    pub user_consent: bool,
    /// Venue identifier
    pub venue: String,
}

/// Per-sample result returned by the ingestion endpoint
///
/// Decoded leniently: missing fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionStatus {
    /// HTTP-style status for the individual sample
    #[serde(default)]
    pub status: u16,
    /// Optional explanation for rejected samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PositionStatus {
    /// True for 2xx statuses
    pub fn is_accepted(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
