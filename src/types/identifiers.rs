//! Identifier types for the venue simulator
//!
//! Device identities come from the registry. Devices created by earlier
//! tooling may carry arbitrary opaque ids, so the id is kept as a string and
//! only freshly provisioned devices are guaranteed to be UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a simulated device
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a new random device ID (UUID v4, hyphenated)
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing registry identity
    pub fn from_existing(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identity string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable 64-bit fingerprint of the identity (FNV-1a).
    ///
    /// Used to derive per-device RNG seeds; unlike `std`'s hasher the value does
    /// not change between toolchains.
    pub fn fingerprint(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        self.0
            .bytes()
            .fold(OFFSET_BASIS, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::from_existing(id)
    }
}
