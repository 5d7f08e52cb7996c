//! `reqwest`-backed ingestion client

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Response, Url};
use std::time::Duration;
use tracing::{debug, warn};

use super::{DeviceToken, IngestApi, PositionSample, PositionStatus, ReportError, ReportResult};
use crate::types::DeviceId;

/// Largest response body the client will read
pub const MAX_RESPONSE_BYTES: u64 = 50 * 1000 * 1000;

/// Redirects followed before a request fails
pub const MAX_REDIRECTS: usize = 10;

/// Shared HTTP client for the token and ingestion endpoints
///
/// Cheap to clone; clones share one keep-alive connection pool.
#[derive(Debug, Clone)]
pub struct HttpIngestClient {
    client: Client,
    base_url: Url,
}

impl HttpIngestClient {
    /// Build a client against `base_url` with a per-request timeout
    pub fn new(base_url: Url, timeout: Duration) -> ReportResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ReportError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL the endpoints are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> ReportResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ReportError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Read the body, refusing anything over [`MAX_RESPONSE_BYTES`]
    async fn read_body(response: Response) -> ReportResult<Vec<u8>> {
        if let Some(length) = response.content_length() {
            if length > MAX_RESPONSE_BYTES {
                return Err(ReportError::ResponseTooLarge(length));
            }
        }

        let body = response.bytes().await?;
        if body.len() as u64 > MAX_RESPONSE_BYTES {
            return Err(ReportError::ResponseTooLarge(body.len() as u64));
        }
        Ok(body.to_vec())
    }

    /// Read the body and turn non-2xx statuses into [`ReportError::Rejected`]
    async fn checked_body(response: Response) -> ReportResult<Vec<u8>> {
        let status = response.status();
        let body = Self::read_body(response).await?;

        if !status.is_success() {
            return Err(ReportError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl IngestApi for HttpIngestClient {
    async fn fetch_token(&self, device: &DeviceId) -> ReportResult<DeviceToken> {
        let url = self.endpoint(&["device", device.as_str(), "token"])?;
        debug!(device = device.as_str(), url = %url, "Requesting device token");

        let response = self.client.get(url).send().await?;
        let body = Self::checked_body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn post_positions(
        &self,
        token: &str,
        samples: &[PositionSample],
    ) -> ReportResult<Vec<PositionStatus>> {
        let url = self.endpoint(&["positions"])?;

        let response = self.client.post(url).bearer_auth(token).json(samples).send().await?;
        let body = Self::checked_body(response).await?;

        match serde_json::from_slice::<Vec<PositionStatus>>(&body) {
            Ok(statuses) => Ok(statuses),
            Err(e) => {
                warn!(error = %e, "Ignoring undecodable ingestion response");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpIngestClient {
        HttpIngestClient::new(Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let root = client("http://localhost:8080");
        assert_eq!(
            root.endpoint(&["device", "abc", "token"]).unwrap().as_str(),
            "http://localhost:8080/device/abc/token"
        );
        assert_eq!(root.endpoint(&["positions"]).unwrap().as_str(), "http://localhost:8080/positions");

        let nested = client("https://ingest.example.test/api/");
        assert_eq!(
            nested.endpoint(&["positions"]).unwrap().as_str(),
            "https://ingest.example.test/api/positions"
        );
    }

    #[test]
    fn test_device_ids_are_percent_encoded() {
        let root = client("http://localhost:8080");
        let url = root.endpoint(&["device", "a/b c", "token"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/device/a%2Fb%20c/token");
    }

    #[test]
    fn test_response_cap_is_fifty_decimal_megabytes() {
        assert_eq!(MAX_RESPONSE_BYTES, 50_000_000);
    }

    #[test]
    fn test_rejects_non_base_urls() {
        let result = HttpIngestClient::new(Url::parse("mailto:ops@example.test").unwrap(), Duration::from_secs(1));
        assert!(matches!(result, Err(ReportError::InvalidUrl(_))));
    }
}
