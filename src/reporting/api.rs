//! The token and ingestion endpoints as a trait

use async_trait::async_trait;

use super::{DeviceToken, PositionSample, PositionStatus, ReportResult};
use crate::types::DeviceId;

/// Remote collaborator that issues device tokens and accepts position batches
#[async_trait]
pub trait IngestApi: Send + Sync {
    /// `GET {base}/device/{id}/token`
    async fn fetch_token(&self, device: &DeviceId) -> ReportResult<DeviceToken>;

    /// `POST {base}/positions` with a bearer token; returns the per-sample statuses
    async fn post_positions(
        &self,
        token: &str,
        samples: &[PositionSample],
    ) -> ReportResult<Vec<PositionStatus>>;
}
