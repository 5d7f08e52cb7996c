//! Authenticated batch reporting
//!
//! Devices report their buffered samples to an ingestion service. Every POST
//! carries a per-device bearer token obtained from the token endpoint and
//! cached until it expires.
//!
//! # Overview
//!
//! - **IngestApi**: the token + ingestion endpoints, as a trait so tests can script them
//! - **HttpIngestClient**: the `reqwest`-backed implementation
//! - **TokenCache** / **DeviceReporter**: lazy token refresh and the flush protocol
//! - **PositionSample**: the JSON wire format of one observation
//!
//! Reporting never propagates failures to the caller. A batch handed to
//! [`DeviceReporter::report`] is gone afterwards, whatever the outcome.

pub mod api;
pub mod error;
pub mod http;
pub mod reporter;
pub mod sample;
pub mod token;

#[cfg(any(test, feature = "test-helpers"))]
pub mod recording;

pub use api::*;
pub use error::*;
pub use http::*;
pub use reporter::*;
pub use sample::*;
pub use token::*;

#[cfg(any(test, feature = "test-helpers"))]
pub use recording::*;
