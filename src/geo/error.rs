//! Geometry validation errors

use thiserror::Error;

/// Errors raised while building geometry from external input
#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    /// Fewer than three distinct vertices after dropping the closing vertex
    #[error("Polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    /// A vertex holds a NaN or infinite coordinate
    #[error("Polygon vertex {index} is not finite: [{lon}, {lat}]")]
    NonFiniteVertex {
        /// Position of the offending vertex in the ring
        index: usize,
        /// Longitude of the vertex
        lon: f64,
        /// Latitude of the vertex
        lat: f64,
    },

    /// The ring encloses no area, or too little of its bounding box to sample
    #[error("Polygon encloses zero area")]
    ZeroArea,

    /// Rejection sampling gave up without landing inside the polygon
    #[error("No point inside the polygon after {attempts} sampling attempts")]
    SamplingExhausted {
        /// Candidates drawn before giving up
        attempts: usize,
    },
}

/// Result type for geometry operations
pub type GeoResult<T> = Result<T, GeoError>;
