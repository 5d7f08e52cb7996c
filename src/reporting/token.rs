//! Device bearer tokens and their cache

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bearer token issued for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceToken {
    /// Opaque bearer token
    pub token: String,
    /// Expiry instant (RFC 3339 on the wire)
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl DeviceToken {
    /// True once `now` has reached the expiry instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// At most one cached token per device
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    current: Option<DeviceToken>,
}

impl TokenCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// A refresh is needed when nothing is cached or the cached token has expired
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.current.as_ref().map_or(true, |token| token.is_expired_at(now))
    }

    /// Replace the cached token
    pub fn store(&mut self, token: DeviceToken) {
        self.current = Some(token);
    }

    /// The cached token, valid or not
    pub fn current(&self) -> Option<&DeviceToken> {
        self.current.as_ref()
    }

    /// Drop the cached token
    pub fn clear(&mut self) {
        self.current = None;
    }
}
