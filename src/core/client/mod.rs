//! Public client surface + builder.
//! Internals are split into `retry` (backoff policy) and `constants` (defaults).

mod constants;
pub mod retry;

pub(crate) use constants::{
    DEFAULT_CHART_HOURS, PATH_CHART_PREFIX, PATH_ENVIRONMENT, PATH_HEALTH, PATH_STATS,
};
pub use retry::{Backoff, CacheMode, RetryConfig};

use crate::core::EnvError;
use crate::core::cache::{CacheStats, CacheStore};
use crate::core::clock::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::range::RangeMode;
use chrono_tz::Tz;
use constants::{DEFAULT_BASE_URL, DEFAULT_CACHE_TTL, STALE_GRACE_FACTOR, USER_AGENT};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the sensor dashboard API.
///
/// Cloning is cheap; clones share the HTTP connection pool and the cache.
#[derive(Debug, Clone)]
pub struct EnvClient {
    http: Client,
    base_url: Url,
    cache: Arc<CacheStore>,
    stale_grace: Duration,
    retry: RetryConfig,
    timezone: Tz,
    range_mode: RangeMode,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for EnvClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl EnvClient {
    /// Create a new builder.
    pub fn builder() -> EnvClientBuilder {
        EnvClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }
    pub(crate) fn cache(&self) -> &CacheStore {
        &self.cache
    }
    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
    pub(crate) fn sleeper(&self) -> &dyn Sleeper {
        self.sleeper.as_ref()
    }

    /// The retry policy used when a call does not override it.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Maximum age at which a cached payload is still served after a failed fetch.
    pub fn stale_grace(&self) -> Duration {
        self.stale_grace
    }

    /// Nominal freshness of a cached payload.
    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Timezone in which the server's wall-clock chart labels are written.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Default axis-bounds mode for prepared charts.
    pub fn range_mode(&self) -> &RangeMode {
        &self.range_mode
    }

    /// Drops every cached payload.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        #[cfg(feature = "tracing")]
        tracing::debug!("response cache cleared");
    }

    /// Number of cached payloads and their keys.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct EnvClientBuilder {
    user_agent: Option<String>,
    base_url: Option<Url>,

    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,

    cache_ttl: Option<Duration>,
    stale_grace: Option<Duration>,
    cache_store: Option<Arc<CacheStore>>,

    retry: Option<RetryConfig>,
    timezone: Option<Tz>,
    range_mode: Option<RangeMode>,

    clock: Option<Arc<dyn Clock>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl EnvClientBuilder {
    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the server root (e.g., `http://raspberrypi.local:5000/`).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set a global request timeout (overall). Default: none.
    #[must_use]
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    #[must_use]
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Nominal TTL of cached payloads. Default: 2 s.
    ///
    /// Unless [`stale_grace`](Self::stale_grace) is set, a cached payload may be
    /// served for five TTLs after it was fetched.
    #[must_use]
    pub fn cache_ttl(mut self, dur: Duration) -> Self {
        self.cache_ttl = Some(dur);
        self
    }

    /// Override the staleness grace window directly.
    #[must_use]
    pub fn stale_grace(mut self, dur: Duration) -> Self {
        self.stale_grace = Some(dur);
        self
    }

    /// Use an existing cache store instead of creating a private one.
    ///
    /// The store's own TTL wins over [`cache_ttl`](Self::cache_ttl).
    #[must_use]
    pub fn cache_store(mut self, store: Arc<CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    /// Default retry policy. Default: 3 attempts, backoff 500 ms then 1 s.
    #[must_use]
    pub fn retry_config(mut self, cfg: RetryConfig) -> Self {
        self.retry = Some(cfg);
        self
    }

    /// Timezone of the server's chart labels. Default: UTC.
    #[must_use]
    pub fn timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }

    /// Default axis-bounds mode. Default: adaptive.
    #[must_use]
    pub fn range_mode(mut self, mode: RangeMode) -> Self {
        self.range_mode = Some(mode);
        self
    }

    /// Replace the wall clock.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replace the timer used between retry attempts.
    #[must_use]
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the default base URL cannot be parsed or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<EnvClient, EnvError> {
        let mut base_url = match self.base_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));

        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build()?;

        let cache = self.cache_store.unwrap_or_else(|| {
            Arc::new(CacheStore::new(self.cache_ttl.unwrap_or(DEFAULT_CACHE_TTL)))
        });
        let stale_grace = self
            .stale_grace
            .unwrap_or_else(|| {
                cache
                    .ttl()
                    .checked_mul(STALE_GRACE_FACTOR)
                    .unwrap_or(Duration::MAX)
            });

        Ok(EnvClient {
            http,
            base_url,
            cache,
            stale_grace,
            retry: self.retry.unwrap_or_default(),
            timezone: self.timezone.unwrap_or(Tz::UTC),
            range_mode: self.range_mode.unwrap_or_default(),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
        })
    }
}
