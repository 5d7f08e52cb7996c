//! Geographic point type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate tolerance, in degrees, under which two points are the same place.
///
/// 1e-9 degrees is roughly 0.1 mm on the ground, well below anything the motion
/// model produces, but above the rounding noise of a translate round trip.
pub const COORD_EPSILON_DEGREES: f64 = 1e-9;

/// A geographic coordinate with an optional accuracy radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Accuracy radius in meters, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl Point {
    /// Create a point without an accuracy radius
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat, accuracy: None }
    }

    /// Attach an accuracy radius
    pub fn with_accuracy(mut self, accuracy_meters: f64) -> Self {
        self.accuracy = Some(accuracy_meters);
        self
    }

    /// The `[lon, lat]` pair used on the wire
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for Point {
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords[0], coords[1])
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lon, self.lat)
    }
}

/// True when both coordinates agree within [`COORD_EPSILON_DEGREES`].
///
/// Accuracy is ignored; only the location matters.
pub fn points_equal(a: &Point, b: &Point) -> bool {
    (a.lon - b.lon).abs() < COORD_EPSILON_DEGREES && (a.lat - b.lat).abs() < COORD_EPSILON_DEGREES
}
