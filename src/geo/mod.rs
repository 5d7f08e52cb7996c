//! Geometry utilities for the venue simulation
//!
//! Pure functions over geographic coordinates: polygon containment, uniform
//! sampling inside a polygon, great-circle distance, bearing, and translation
//! along a bearing.
//!
//! # Usage Example
//!
//! ```rust
//! use venue_position_faker::geo::*;
//!
//! let area = Polygon::new(vec![
//!     [-79.3900, 43.6420],
//!     [-79.3880, 43.6420],
//!     [-79.3880, 43.6435],
//!     [-79.3900, 43.6435],
//! ])?;
//!
//! let mut rng = rand::thread_rng();
//! let point = area.sample_uniform(&mut rng)?;
//! assert!(area.contains(&point));
//!
//! let origin = Point::new(-79.3900, 43.6420);
//! let meters = distance_meters(&origin, &point);
//! let moved = translate(&origin, meters, bearing_degrees(&origin, &point));
//! assert!(distance_meters(&moved, &point) < 0.01);
//! # Ok::<(), GeoError>(())
//! ```

pub mod error;
pub mod point;
pub mod polygon;
pub mod sphere;

// Re-export all public types for convenience
pub use error::*;
pub use point::*;
pub use polygon::*;
pub use sphere::*;
