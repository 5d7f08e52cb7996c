//! Enumeration types for the venue simulator
//!
//! Cosmetic registry metadata: the hardware model of a device and the role
//! suffix used to build its display name.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hardware model label attached to provisioned devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceModel {
    /// iPhone XS
    IPhoneXs,
    /// iPhone XS Max
    IPhoneXsMax,
    /// iPhone XR
    IPhoneXr,
    /// iPhone 11 Pro
    IPhone11Pro,
    /// iPhone 11 Pro Max
    IPhone11ProMax,
    /// iPhone 11 SE
    IPhone11Se,
    /// iPhone 11
    IPhone11,
    /// iPhone 8
    IPhone8,
    /// iPhone 8 Plus
    IPhone8Plus,
    /// iPhone 7 Plus
    IPhone7Plus,
    /// iPhone 7
    IPhone7,
    /// iPhone 6S
    IPhone6s,
    /// iPad
    IPad,
}

impl DeviceModel {
    /// Every model, in catalogue order
    pub const ALL: [DeviceModel; 13] = [
        DeviceModel::IPhoneXs,
        DeviceModel::IPhoneXsMax,
        DeviceModel::IPhoneXr,
        DeviceModel::IPhone11Pro,
        DeviceModel::IPhone11ProMax,
        DeviceModel::IPhone11Se,
        DeviceModel::IPhone11,
        DeviceModel::IPhone8,
        DeviceModel::IPhone8Plus,
        DeviceModel::IPhone7Plus,
        DeviceModel::IPhone7,
        DeviceModel::IPhone6s,
        DeviceModel::IPad,
    ];

    /// Pick a model uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&DeviceModel::IPhone11)
    }

    /// Label as stored in the registry
    pub fn label(&self) -> &'static str {
        match self {
            DeviceModel::IPhoneXs => "iPhone XS",
            DeviceModel::IPhoneXsMax => "iPhone XS Max",
            DeviceModel::IPhoneXr => "iPhone XR",
            DeviceModel::IPhone11Pro => "iPhone 11 Pro",
            DeviceModel::IPhone11ProMax => "iPhone 11 Pro Max",
            DeviceModel::IPhone11Se => "iPhone 11 SE",
            DeviceModel::IPhone11 => "iPhone 11",
            DeviceModel::IPhone8 => "iPhone 8",
            DeviceModel::IPhone8Plus => "iPhone 8 Plus",
            DeviceModel::IPhone7Plus => "iPhone 7 Plus",
            DeviceModel::IPhone7 => "iPhone 7",
            DeviceModel::IPhone6s => "iPhone 6S",
            DeviceModel::IPad => "iPad",
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeviceModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|model| model.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown device model: {}", s))
    }
}

/// Role prefix used in generated device names ("Security iPhone 8")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceRole {
    /// Enterprise-issued handset
    Enterprise,
    /// Floor supervisor
    Supervisor,
    /// Venue manager
    Manager,
    /// Security staff
    Security,
    /// Maintenance crew
    Maintenance,
}

impl DeviceRole {
    /// Every role
    pub const ALL: [DeviceRole; 5] = [
        DeviceRole::Enterprise,
        DeviceRole::Supervisor,
        DeviceRole::Manager,
        DeviceRole::Security,
        DeviceRole::Maintenance,
    ];

    /// Pick a role uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&DeviceRole::Enterprise)
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceRole::Enterprise => write!(f, "Enterprise"),
            DeviceRole::Supervisor => write!(f, "Supervisor"),
            DeviceRole::Manager => write!(f, "Manager"),
            DeviceRole::Security => write!(f, "Security"),
            DeviceRole::Maintenance => write!(f, "Maintenance"),
        }
    }
}

impl FromStr for DeviceRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enterprise" => Ok(DeviceRole::Enterprise),
            "supervisor" => Ok(DeviceRole::Supervisor),
            "manager" => Ok(DeviceRole::Manager),
            "security" => Ok(DeviceRole::Security),
            "maintenance" => Ok(DeviceRole::Maintenance),
            _ => Err(format!("Unknown device role: {}", s)),
        }
    }
}
