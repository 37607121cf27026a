//! Centralized constants for default endpoints and client policy.

use std::time::Duration;

/// Default User-Agent sent with every request.
pub(crate) const USER_AGENT: &str = concat!("envdash-rs/", env!("CARGO_PKG_VERSION"));

/// Default dashboard server root.
pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:5000/";

/// Current readings from every sensor.
pub(crate) const PATH_ENVIRONMENT: &str = "api/environment";

/// Chart endpoints; the chart kind slug is appended.
pub(crate) const PATH_CHART_PREFIX: &str = "api/chart/";

/// Database record counters.
pub(crate) const PATH_STATS: &str = "api/stats";

/// Service health.
pub(crate) const PATH_HEALTH: &str = "api/health";

/// Nominal freshness of a cached payload.
pub(crate) const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(2);

/// A cached payload stays usable as a fallback for this many TTLs.
pub(crate) const STALE_GRACE_FACTOR: u32 = 5;

/// Total attempts per logical request.
pub(crate) const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay after the first failed attempt; doubled after each further failure.
pub(crate) const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Window requested by chart fetches unless overridden.
pub(crate) const DEFAULT_CHART_HOURS: u32 = 24;
