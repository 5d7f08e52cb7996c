//! Venue boundary polygon
//!
//! The polygon is treated as planar in (lon, lat) space. Venues are a few
//! hundred meters across, so the distortion against a true spherical polygon
//! is negligible for containment and sampling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GeoError, GeoResult, Point};

/// Smallest accepted ratio of polygon area to bounding-box area.
///
/// Collinear rings keep a rounding residue in the shoelace sum, so the check
/// is relative to the box rather than against an absolute epsilon.
pub const MIN_AREA_RATIO: f64 = 1e-6;

/// Candidates drawn by [`Polygon::sample_uniform`] before it gives up
pub const MAX_SAMPLE_ATTEMPTS: usize = 100_000;

/// A simple polygon described by a single ring of `[lon, lat]` vertices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Polygon {
    vertices: Vec<[f64; 2]>,
    min: [f64; 2],
    max: [f64; 2],
}

impl Polygon {
    /// Build a polygon from a ring of `[lon, lat]` vertices.
    ///
    /// The ring may be open or closed; a trailing vertex equal to the first is
    /// dropped. The ring must have at least three vertices, finite coordinates,
    /// and enclose a non-zero area.
    pub fn new(mut ring: Vec<[f64; 2]>) -> GeoResult<Self> {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        if ring.len() < 3 {
            return Err(GeoError::TooFewVertices(ring.len()));
        }

        for (index, vertex) in ring.iter().enumerate() {
            if !vertex[0].is_finite() || !vertex[1].is_finite() {
                return Err(GeoError::NonFiniteVertex { index, lon: vertex[0], lat: vertex[1] });
            }
        }

        let mut min = ring[0];
        let mut max = ring[0];
        for vertex in &ring[1..] {
            min[0] = min[0].min(vertex[0]);
            min[1] = min[1].min(vertex[1]);
            max[0] = max[0].max(vertex[0]);
            max[1] = max[1].max(vertex[1]);
        }

        let (width, height) = (max[0] - min[0], max[1] - min[1]);
        if width <= 0.0 || height <= 0.0 {
            return Err(GeoError::ZeroArea);
        }

        let polygon = Self { vertices: ring, min, max };
        if polygon.area() <= MIN_AREA_RATIO * width * height {
            return Err(GeoError::ZeroArea);
        }

        Ok(polygon)
    }

    /// Vertices of the ring, without the closing vertex
    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.vertices
    }

    /// Bounding box as `(min, max)` corners
    pub fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        (self.min, self.max)
    }

    /// Planar area in square degrees (shoelace formula)
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let twice_area: f64 = (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a[0] * b[1] - b[0] * a[1]
            })
            .sum();
        twice_area.abs() / 2.0
    }

    /// Even-odd ray casting containment test
    pub fn contains(&self, point: &Point) -> bool {
        let (x, y) = (point.lon, point.lat);
        if x < self.min[0] || x > self.max[0] || y < self.min[1] || y > self.max[1] {
            return false;
        }

        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let [xi, yi] = self.vertices[i];
            let [xj, yj] = self.vertices[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Draw a point uniformly over the polygon's area.
    ///
    /// Rejection sampling against the bounding box: candidates are uniform over
    /// the box and only those `contains` accepts are returned, so the result is
    /// uniform over the polygon itself. Gives up after [`MAX_SAMPLE_ATTEMPTS`].
    pub fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> GeoResult<Point> {
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let candidate = Point::new(
                rng.gen_range(self.min[0]..self.max[0]),
                rng.gen_range(self.min[1]..self.max[1]),
            );
            if self.contains(&candidate) {
                return Ok(candidate);
            }
        }
        Err(GeoError::SamplingExhausted { attempts: MAX_SAMPLE_ATTEMPTS })
    }
}

impl TryFrom<Vec<[f64; 2]>> for Polygon {
    type Error = GeoError;

    fn try_from(ring: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        Self::new(ring)
    }
}

impl From<Polygon> for Vec<[f64; 2]> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}
