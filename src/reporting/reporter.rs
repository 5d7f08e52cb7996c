//! Per-device flush protocol

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{IngestApi, PositionSample, ReportError, TokenCache};
use crate::types::DeviceId;

/// What happened to a flushed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The endpoint accepted the request
    Delivered {
        /// Samples in the batch
        samples: usize,
        /// Per-sample statuses reported as accepted
        accepted: usize,
        /// Per-sample statuses reported as rejected
        rejected: usize,
    },
    /// No token could be obtained; the batch was discarded unsent
    Skipped {
        /// Samples discarded
        samples: usize,
    },
    /// The POST failed; the batch was discarded
    Failed {
        /// Samples discarded
        samples: usize,
    },
}

impl ReportOutcome {
    /// Number of samples in the flushed batch
    pub fn samples(&self) -> usize {
        match self {
            ReportOutcome::Delivered { samples, .. }
            | ReportOutcome::Skipped { samples }
            | ReportOutcome::Failed { samples } => *samples,
        }
    }

    /// True when the batch reached the endpoint
    pub fn is_delivered(&self) -> bool {
        matches!(self, ReportOutcome::Delivered { .. })
    }
}

/// Result of one flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    /// Fate of the batch
    pub outcome: ReportOutcome,
    /// Whether a fresh token was fetched for this flush
    pub token_fetched: bool,
}

/// Reports batches for a single device, caching its bearer token
#[derive(Debug, Clone)]
pub struct DeviceReporter {
    device: DeviceId,
    cache: TokenCache,
}

impl DeviceReporter {
    /// Create a reporter with an empty token cache
    pub fn new(device: DeviceId) -> Self {
        Self { device, cache: TokenCache::new() }
    }

    /// The device this reporter speaks for
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    /// Token cache, for inspection
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Token cache, for seeding a known credential
    pub fn cache_mut(&mut self) -> &mut TokenCache {
        &mut self.cache
    }

    /// Make sure a usable token is cached, fetching one if needed.
    ///
    /// Returns the bearer token and whether it was freshly fetched. Failures are
    /// logged and yield `None`; the cache is left empty so the next flush retries.
    pub async fn ensure_token(
        &mut self,
        api: &dyn IngestApi,
        now: DateTime<Utc>,
    ) -> Option<(String, bool)> {
        if !self.cache.needs_refresh(now) {
            return self.cache.current().map(|token| (token.token.clone(), false));
        }

        self.cache.clear();
        match api.fetch_token(&self.device).await {
            Ok(token) if token.token.is_empty() => {
                let error = ReportError::TokenUnavailable(self.device.to_string());
                warn!(device = self.device.as_str(), error = %error, "Token endpoint returned an empty token");
                None
            }
            Ok(token) => {
                debug!(device = self.device.as_str(), expires_at = %token.expires_at, "Fetched device token");
                let bearer = token.token.clone();
                self.cache.store(token);
                Some((bearer, true))
            }
            Err(e) => {
                warn!(device = self.device.as_str(), error = %e, status = ?e.status(), "Failed to fetch device token");
                None
            }
        }
    }

    /// Send `batch` to the ingestion endpoint.
    ///
    /// The batch is consumed: it is never retried or requeued, whatever the outcome.
    pub async fn report(&mut self, api: &dyn IngestApi, batch: Vec<PositionSample>) -> FlushReport {
        let samples = batch.len();

        let Some((token, token_fetched)) = self.ensure_token(api, Utc::now()).await else {
            warn!(device = self.device.as_str(), samples, "No token, discarding batch");
            return FlushReport { outcome: ReportOutcome::Skipped { samples }, token_fetched: false };
        };

        let outcome = match api.post_positions(&token, &batch).await {
            Ok(statuses) => {
                let accepted = statuses.iter().filter(|s| s.is_accepted()).count();
                let rejected = statuses.len() - accepted;
                debug!(device = self.device.as_str(), samples, accepted, rejected, "Batch delivered");
                ReportOutcome::Delivered { samples, accepted, rejected }
            }
            Err(ReportError::Rejected { status, body }) => {
                warn!(device = self.device.as_str(), samples, status, body = body.as_str(), "Ingestion endpoint rejected batch");
                ReportOutcome::Failed { samples }
            }
            Err(e) => {
                warn!(device = self.device.as_str(), samples, error = %e, "Failed to deliver batch");
                ReportOutcome::Failed { samples }
            }
        };

        FlushReport { outcome, token_fetched }
    }
}
