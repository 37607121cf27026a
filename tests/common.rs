#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use envdash::core::{Clock, Sleeper};
use envdash::{EnvClient, RetryConfig};
use httpmock::{Method::GET, Mock, MockServer};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use std::{fs, path::Path};
use url::Url;

pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{name}.json"));
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

/// 2026-10-17 09:30:00 UTC.
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap()
}

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

#[derive(Debug)]
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.0.lock().unwrap();
        *guard += chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Records every requested pause and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper(Mutex<Vec<Duration>>);

impl RecordingSleeper {
    pub fn pauses(&self) -> Vec<Duration> {
        self.0.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, dur: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.0.lock().unwrap().push(dur);
        Box::pin(async {})
    }
}

/// Routes the crate's spans and events to the test output when built with
/// `--features tracing-subscriber`. Filtered by `RUST_LOG`.
pub fn init_tracing() {
    #[cfg(feature = "tracing-subscriber")]
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

pub struct Harness {
    pub client: EnvClient,
    pub clock: Arc<ManualClock>,
    pub sleeper: Arc<RecordingSleeper>,
}

pub fn harness(server: &MockServer) -> Harness {
    harness_with(server, RetryConfig::default())
}

pub fn harness_with(server: &MockServer, retry: RetryConfig) -> Harness {
    init_tracing();
    let clock = Arc::new(ManualClock::new(reference_now()));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = EnvClient::builder()
        .base_url(Url::parse(&server.base_url()).unwrap())
        .cache_ttl(Duration::from_secs(2))
        .retry_config(retry)
        .clock(clock.clone())
        .sleeper(sleeper.clone())
        .build()
        .unwrap();
    Harness {
        client,
        clock,
        sleeper,
    }
}

pub fn mock_chart<'a>(server: &'a MockServer, slug: &str, hours: u32) -> Mock<'a> {
    let body = fixture(&format!("chart_{slug}"));
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/chart/{slug}"))
            .query_param("hours", hours.to_string());
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    })
}

pub fn mock_failing<'a>(server: &'a MockServer, path: &str, status: u16) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path(path.to_string());
        then.status(status).body("Service Unavailable");
    })
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
