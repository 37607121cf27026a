use envdash::{CacheMode, EnvError, FetchRequest, FetchResult};
use httpmock::{Method::GET, MockServer};
use serde_json::json;
use std::time::Duration;

use crate::common::{harness, mock_failing, reference_now};

const BODY: &str = r#"{"sensors":{"scd40":{"co2":640,"status":"online"}},"timestamp":1792229400}"#;

#[tokio::test]
async fn exhaustion_without_cache_is_failed_not_stale() {
    let server = MockServer::start();
    let _fail = mock_failing(&server, "/api/environment", 503);

    let h = harness(&server);
    let result = h
        .client
        .fetch(&FetchRequest::new("api/environment"), CacheMode::Fallback, None)
        .await;

    assert!(matches!(result, FetchResult::Failed { .. }));
    assert!(result.payload().is_none());
}

#[tokio::test]
async fn cached_payload_within_grace_is_served_stale() {
    let server = MockServer::start();
    let mut ok = server.mock(|when, then| {
        when.method(GET).path("/api/environment");
        then.status(200).body(BODY);
    });

    let h = harness(&server);
    let req = FetchRequest::new("api/environment");
    assert!(h.client.fetch(&req, CacheMode::Fallback, None).await.is_fresh());
    ok.delete();
    let fail = mock_failing(&server, "/api/environment", 503);

    // TTL is 2 s, so the grace window is 10 s, inclusive.
    h.clock.advance(Duration::from_secs(10));
    let result = h.client.fetch(&req, CacheMode::Fallback, None).await;

    fail.assert_calls(3);
    match result {
        FetchResult::Stale {
            payload,
            fetched_at,
            reason,
        } => {
            assert_eq!(payload, serde_json::from_str::<serde_json::Value>(BODY).unwrap());
            assert_eq!(fetched_at, reference_now());
            assert!(matches!(reason, EnvError::Status { status: 503, .. }));
        }
        other => panic!("expected Stale, got {other:?}"),
    }
}

#[tokio::test]
async fn cached_payload_past_grace_is_failed() {
    let server = MockServer::start();
    let mut ok = server.mock(|when, then| {
        when.method(GET).path("/api/environment");
        then.status(200).body(BODY);
    });

    let h = harness(&server);
    let req = FetchRequest::new("api/environment");
    assert!(h.client.fetch(&req, CacheMode::Fallback, None).await.is_fresh());
    ok.delete();
    let _fail = mock_failing(&server, "/api/environment", 503);

    h.clock.advance(Duration::from_millis(10_001));
    let result = h.client.fetch(&req, CacheMode::Fallback, None).await;

    assert!(matches!(result, FetchResult::Failed { .. }));
    // The stale entry is still there; it is simply too old to use.
    assert_eq!(h.client.cache_stats().await.size, 1);
}

#[tokio::test]
async fn stale_fallback_is_per_key() {
    let server = MockServer::start();
    let _ok = server.mock(|when, then| {
        when.method(GET).path("/api/chart/co2").query_param("hours", "24");
        then.status(200).body(r#"{"labels":[],"datasets":[]}"#);
    });
    let _fail = server.mock(|when, then| {
        when.method(GET).path("/api/chart/co2").query_param("hours", "168");
        then.status(502);
    });

    let h = harness(&server);
    let day = FetchRequest::new("api/chart/co2").param("hours", 24);
    let week = FetchRequest::new("api/chart/co2").param("hours", 168);
    assert!(h.client.fetch(&day, CacheMode::Fallback, None).await.is_fresh());

    let result = h.client.fetch(&week, CacheMode::Fallback, None).await;
    assert!(matches!(result, FetchResult::Failed { .. }));
}

#[tokio::test]
async fn bypass_neither_writes_nor_reads_the_cache() {
    let server = MockServer::start();
    let mut ok = server.mock(|when, then| {
        when.method(GET).path("/api/environment");
        then.status(200).body(BODY);
    });

    let h = harness(&server);
    let req = FetchRequest::new("api/environment");
    assert!(h.client.fetch(&req, CacheMode::Bypass, None).await.is_fresh());
    assert_eq!(h.client.cache_stats().await.size, 0);

    assert!(h.client.fetch(&req, CacheMode::Fallback, None).await.is_fresh());
    ok.delete();
    let _fail = mock_failing(&server, "/api/environment", 503);

    let result = h.client.fetch(&req, CacheMode::Bypass, None).await;
    assert!(matches!(result, FetchResult::Failed { .. }));
}

#[tokio::test]
async fn clear_cache_removes_fallback() {
    let server = MockServer::start();
    let mut ok = server.mock(|when, then| {
        when.method(GET).path("/api/environment");
        then.status(200).body(BODY);
    });

    let h = harness(&server);
    let req = FetchRequest::new("api/environment");
    assert!(h.client.fetch(&req, CacheMode::Fallback, None).await.is_fresh());
    ok.delete();
    let _fail = mock_failing(&server, "/api/environment", 503);

    h.client.clear_cache().await;
    let result = h.client.fetch(&req, CacheMode::Fallback, None).await;
    assert!(matches!(result, FetchResult::Failed { .. }));
}

#[tokio::test]
async fn into_payload_maps_stale_reason_to_text() {
    let server = MockServer::start();
    let mut ok = server.mock(|when, then| {
        when.method(GET).path("/api/environment");
        then.status(200).body(BODY);
    });

    let h = harness(&server);
    let req = FetchRequest::new("api/environment");
    let _ = h.client.fetch(&req, CacheMode::Fallback, None).await;
    ok.delete();
    let _fail = mock_failing(&server, "/api/environment", 503);

    let (payload, freshness) = h
        .client
        .fetch(&req, CacheMode::Fallback, None)
        .await
        .into_payload()
        .unwrap();
    assert_eq!(payload["sensors"]["scd40"]["co2"], json!(640));
    match freshness {
        envdash::Freshness::Stale { fetched_at, reason } => {
            assert_eq!(fetched_at, reference_now());
            assert!(reason.contains("503"), "reason was {reason}");
        }
        envdash::Freshness::Fresh => panic!("expected stale"),
    }
}
