//! Reporting protocol tests
//!
//! Token caching and batch delivery against the recording double, plus the
//! `reqwest` client against a minimal in-process HTTP server.

use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use venue_position_faker::device::*;
use venue_position_faker::geo::Polygon;
use venue_position_faker::reporting::*;
use venue_position_faker::types::DeviceId;

fn sample(device: &str) -> PositionSample {
    PositionSample {
        acc: 3.2,
        device: DeviceId::from_existing(device),
        floor: 2,
        lonlat: [-79.3866, 43.6431],
        time: 1_700_000_000_000,
        user_consent: true,
        venue: "hall".into(),
    }
}

fn idle_device(id: &str) -> SimulatedDevice {
    let area = Polygon::new(vec![
        [-79.3871, 43.6426],
        [-79.3855, 43.6426],
        [-79.3855, 43.6437],
        [-79.3871, 43.6437],
    ])
    .unwrap();
    let profile = DeviceProfile { speed_mps: 1.4, stillness: 1.0, floor: 1, time_offset_ms: 0, initial_accuracy: 3.0 };
    SimulatedDevice::new(
        DeviceId::from_existing(id),
        "hall",
        Arc::new(area),
        profile,
        DeviceSettings::default(),
        0,
        StdRng::seed_from_u64(1),
    )
    .unwrap()
}

/// Tick an always-idle device until its batch flushes
async fn tick_until_flush(device: &mut SimulatedDevice, api: &dyn IngestApi) -> FlushReport {
    let mut now = device.clock_ms();
    loop {
        now += 31_000;
        if let Some(flush) = device.tick(now, api).await.flush {
            return flush;
        }
    }
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once_before_post() {
    let api = RecordingIngestApi::new();
    let mut device = idle_device("stale");
    device.reporter_mut().cache_mut().store(DeviceToken {
        token: "stale-token".into(),
        expires_at: Utc::now() - ChronoDuration::minutes(1),
    });

    let flush = tick_until_flush(&mut device, &api).await;
    assert!(flush.token_fetched);
    assert!(flush.outcome.is_delivered());

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], RecordedCall::FetchToken(DeviceId::from_existing("stale")));
    match &calls[1] {
        RecordedCall::PostPositions { token, samples } => {
            assert_eq!(token, "token-stale-1");
            assert_eq!(samples.len(), 21);
        }
        other => panic!("expected a POST, got {:?}", other),
    }
}

#[tokio::test]
async fn test_token_reused_across_flushes() {
    let api = RecordingIngestApi::new();
    let mut device = idle_device("reuse");

    let first = tick_until_flush(&mut device, &api).await;
    let second = tick_until_flush(&mut device, &api).await;

    assert!(first.token_fetched);
    assert!(!second.token_fetched);
    assert_eq!(api.token_fetches(), 1);
    assert_eq!(api.posts(), 2);
}

#[tokio::test]
async fn test_server_error_discards_batch() {
    let api = RecordingIngestApi::new().with_post_status(500);
    let mut device = idle_device("unlucky");

    let flush = tick_until_flush(&mut device, &api).await;
    assert_eq!(flush.outcome, ReportOutcome::Failed { samples: 21 });
    assert!(device.batch().is_empty());

    // the next batch starts from scratch; nothing was requeued
    device.tick(10_000_000, &api).await;
    assert_eq!(device.batch().len(), 1);
}

#[tokio::test]
async fn test_token_failure_skips_batch_and_retries_next_time() {
    let api = RecordingIngestApi::new().failing_tokens();
    let mut reporter = DeviceReporter::new(DeviceId::from_existing("no-token"));

    let first = reporter.report(&api, vec![sample("no-token")]).await;
    assert_eq!(first.outcome, ReportOutcome::Skipped { samples: 1 });
    let second = reporter.report(&api, vec![sample("no-token")]).await;
    assert_eq!(second.outcome, ReportOutcome::Skipped { samples: 1 });

    assert_eq!(api.token_fetches(), 2);
    assert_eq!(api.posts(), 0);
    assert!(reporter.cache().current().is_none());
}

#[tokio::test]
async fn test_rejected_statuses_are_counted() {
    let api = RecordingIngestApi::new().with_token_ttl(ChronoDuration::minutes(5));
    let mut reporter = DeviceReporter::new(DeviceId::from_existing("counted"));

    let flush = reporter.report(&api, vec![sample("counted"), sample("counted")]).await;
    assert_eq!(flush.outcome, ReportOutcome::Delivered { samples: 2, accepted: 2, rejected: 0 });
    assert_eq!(flush.outcome.samples(), 2);
}

/// Serve canned JSON responses and log each raw request
async fn spawn_ingest_server(post_status: u16) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = requests.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let log = log.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let (status, body) = if request.starts_with("GET /device/") {
                    (200, r#"{"token":"server-token","expiresAt":"2099-01-01T00:00:00Z"}"#)
                } else {
                    (post_status, r#"[{"status":201},{"status":422,"message":"outside venue"}]"#)
                };
                log.lock().unwrap().push(request);

                let reason = if status < 300 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}", address), requests)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = socket.read(&mut chunk).await.unwrap_or(0);
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);

        if let Some(end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buffer[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buffer.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

fn http_client(base: &str) -> HttpIngestClient {
    HttpIngestClient::new(reqwest::Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_http_client_fetches_token_then_posts_batch() {
    let (base, requests) = spawn_ingest_server(200).await;
    let client = http_client(&base);
    let mut reporter = DeviceReporter::new(DeviceId::from_existing("dev-http"));

    let flush = reporter.report(&client, vec![sample("dev-http")]).await;
    assert_eq!(flush.outcome, ReportOutcome::Delivered { samples: 1, accepted: 1, rejected: 1 });
    assert!(flush.token_fetched);
    assert_eq!(reporter.cache().current().unwrap().token, "server-token");

    let requests = requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("GET /device/dev-http/token "));
    assert!(requests[1].starts_with("POST /positions "));

    let post = requests[1].to_lowercase();
    assert!(post.contains("authorization: bearer server-token"));
    assert!(post.contains("content-type: application/json"));
    assert!(requests[1].contains(r#""userConsent":true"#));
    assert!(requests[1].contains(r#""lonlat":[-79.3866,43.6431]"#));
}

#[tokio::test]
async fn test_http_client_maps_server_error_to_failed_batch() {
    let (base, _requests) = spawn_ingest_server(500).await;
    let client = http_client(&base);

    let error = client.post_positions("t", &[sample("d")]).await.unwrap_err();
    assert_eq!(error.status(), Some(500));

    let mut reporter = DeviceReporter::new(DeviceId::from_existing("d"));
    let flush = reporter.report(&client, vec![sample("d")]).await;
    assert_eq!(flush.outcome, ReportOutcome::Failed { samples: 1 });
}

#[tokio::test]
async fn test_unreachable_endpoint_skips_without_panicking() {
    // bind then drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let client = HttpIngestClient::new(
        reqwest::Url::parse(&format!("http://127.0.0.1:{}", port)).unwrap(),
        Duration::from_secs(2),
    )
    .unwrap();

    let mut reporter = DeviceReporter::new(DeviceId::from_existing("offline"));
    let flush = reporter.report(&client, vec![sample("offline"), sample("offline")]).await;
    assert_eq!(flush.outcome, ReportOutcome::Skipped { samples: 2 });
    assert!(!flush.token_fetched);
}

/// Answer every request with headers announcing a body of `length` bytes
async fn spawn_oversized_server(length: u64) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    length
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", address)
}

#[tokio::test]
async fn test_body_just_over_fifty_megabytes_is_refused_unread() {
    let base = spawn_oversized_server(50_000_001).await;
    let client = http_client(&base);

    let error = client.post_positions("t", &[sample("big")]).await.unwrap_err();
    assert!(matches!(error, ReportError::ResponseTooLarge(50_000_001)), "got {:?}", error);
}
