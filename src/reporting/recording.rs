//! Scripted in-process ingestion endpoint
//!
//! Records every call in order and answers from a small script, so device and
//! driver behaviour can be checked without a network.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::{Mutex, MutexGuard};

use super::{DeviceToken, IngestApi, PositionSample, PositionStatus, ReportError, ReportResult};
use crate::types::DeviceId;

/// One call observed by [`RecordingIngestApi`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// A token request
    FetchToken(DeviceId),
    /// A batch POST
    PostPositions {
        /// Bearer token presented
        token: String,
        /// Batch body
        samples: Vec<PositionSample>,
    },
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<RecordedCall>,
    tokens_issued: u64,
}

/// [`IngestApi`] double that records calls and answers from a script
#[derive(Debug)]
pub struct RecordingIngestApi {
    state: Mutex<RecordingState>,
    token_ttl: Duration,
    post_status: u16,
    fail_tokens: bool,
}

impl Default for RecordingIngestApi {
    fn default() -> Self {
        Self {
            state: Mutex::new(RecordingState::default()),
            token_ttl: Duration::hours(1),
            post_status: 207,
            fail_tokens: false,
        }
    }
}

impl RecordingIngestApi {
    /// Issue one-hour tokens and accept every batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifetime of issued tokens (negative values issue already-expired tokens)
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// HTTP status returned for every POST
    pub fn with_post_status(mut self, status: u16) -> Self {
        self.post_status = status;
        self
    }

    /// Make the token endpoint fail
    pub fn failing_tokens(mut self) -> Self {
        self.fail_tokens = true;
        self
    }

    fn state(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every call, in the order received
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Number of token requests
    pub fn token_fetches(&self) -> usize {
        self.state().calls.iter().filter(|c| matches!(c, RecordedCall::FetchToken(_))).count()
    }

    /// Number of batch POSTs
    pub fn posts(&self) -> usize {
        self.state().calls.iter().filter(|c| matches!(c, RecordedCall::PostPositions { .. })).count()
    }

    /// All samples received across every POST
    pub fn posted_samples(&self) -> Vec<PositionSample> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::PostPositions { samples, .. } => Some(samples.clone()),
                RecordedCall::FetchToken(_) => None,
            })
            .flatten()
            .collect()
    }
}

#[async_trait]
impl IngestApi for RecordingIngestApi {
    async fn fetch_token(&self, device: &DeviceId) -> ReportResult<DeviceToken> {
        let mut state = self.state();
        state.calls.push(RecordedCall::FetchToken(device.clone()));

        if self.fail_tokens {
            return Err(ReportError::Rejected { status: 503, body: "token service unavailable".into() });
        }

        state.tokens_issued += 1;
        Ok(DeviceToken {
            token: format!("token-{}-{}", device, state.tokens_issued),
            expires_at: Utc::now() + self.token_ttl,
        })
    }

    async fn post_positions(
        &self,
        token: &str,
        samples: &[PositionSample],
    ) -> ReportResult<Vec<PositionStatus>> {
        self.state()
            .calls
            .push(RecordedCall::PostPositions { token: token.to_string(), samples: samples.to_vec() });

        if !(200..300).contains(&self.post_status) {
            return Err(ReportError::Rejected {
                status: self.post_status,
                body: "scripted failure".into(),
            });
        }

        Ok(samples.iter().map(|_| PositionStatus { status: 201, message: None }).collect())
    }
}
