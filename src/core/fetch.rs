//! One logical request: bounded retries with backoff, then the cache fallback.

use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::header::{ACCEPT, HeaderValue};
use std::collections::BTreeMap;
use url::Url;

use crate::core::client::{CacheMode, RetryConfig};
use crate::core::models::Freshness;
use crate::core::{EnvClient, EnvError};

/// An endpoint plus query parameters, and the cache key they map to.
///
/// Parameters are kept sorted so two requests with the same parameters always
/// produce the same key, whatever order they were added in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    endpoint: String,
    params: BTreeMap<String, String>,
    cache_key: String,
}

impl FetchRequest {
    /// A request for `endpoint`, a path relative to the client's base URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let cache_key = endpoint.clone();
        Self {
            endpoint,
            params: BTreeMap::new(),
            cache_key,
        }
    }

    /// Adds (or replaces) a query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self.cache_key = cache_key(&self.endpoint, &self.params);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    fn url(&self, base: &Url) -> Result<Url, EnvError> {
        let mut url = base.join(&self.endpoint)?;
        if !self.params.is_empty() {
            let mut qp = url.query_pairs_mut();
            for (k, v) in &self.params {
                qp.append_pair(k, v);
            }
        }
        Ok(url)
    }
}

fn cache_key(endpoint: &str, params: &BTreeMap<String, String>) -> String {
    let mut key = endpoint.to_string();
    for (i, (k, v)) in params.iter().enumerate() {
        key.push(if i == 0 { '?' } else { '&' });
        key.push_str(k);
        key.push('=');
        key.push_str(v);
    }
    key
}

/// Outcome of one logical request. Exactly one variant is produced per call.
#[derive(Debug)]
pub enum FetchResult {
    /// A live response from this call.
    Fresh { payload: serde_json::Value },
    /// Every attempt failed, but a cached payload within the grace window exists.
    Stale {
        payload: serde_json::Value,
        fetched_at: DateTime<Utc>,
        reason: EnvError,
    },
    /// Every attempt failed and nothing usable was cached.
    Failed { reason: EnvError },
}

impl FetchResult {
    /// The payload, unless the request failed outright.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Fresh { payload } | Self::Stale { payload, .. } => Some(payload),
            Self::Failed { .. } => None,
        }
    }

    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh { .. })
    }

    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }

    /// Splits into payload and provenance, turning `Failed` into its error.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error if the request failed and no cached payload
    /// could stand in for it.
    pub fn into_payload(self) -> Result<(serde_json::Value, Freshness), EnvError> {
        match self {
            Self::Fresh { payload } => Ok((payload, Freshness::Fresh)),
            Self::Stale {
                payload,
                fetched_at,
                reason,
            } => Ok((
                payload,
                Freshness::Stale {
                    fetched_at,
                    reason: reason.to_string(),
                },
            )),
            Self::Failed { reason } => Err(reason),
        }
    }
}

/// Shape check run on every decoded body before it counts as a success.
pub type PayloadCheck<'a> = &'a (dyn Fn(&serde_json::Value) -> Result<(), EnvError> + Sync);

/// State threaded through the attempt fold.
enum Attempt {
    Pending(Option<EnvError>),
    Done(serde_json::Value),
}

impl EnvClient {
    /// Performs one logical GET for `req`, accepting any JSON body.
    ///
    /// See [`fetch_checked`](EnvClient::fetch_checked).
    pub async fn fetch(
        &self,
        req: &FetchRequest,
        cache_mode: CacheMode,
        retry_override: Option<&RetryConfig>,
    ) -> FetchResult {
        self.fetch_checked(req, cache_mode, retry_override, &|_| Ok(()))
            .await
    }

    /// Performs one logical GET for `req`.
    ///
    /// Up to `retry.attempts()` attempts are made (the client default unless
    /// `retry_override` is given), sleeping `retry.delay_before(i)` before attempt
    /// `i`. An attempt fails on a transport error, a non-2xx status, a body that is
    /// not JSON, or a body rejected by `check`. A success is written to the cache
    /// and returned as [`FetchResult::Fresh`], so only checked payloads are ever
    /// cached. When every attempt fails, the cached payload for the same key is
    /// returned as [`FetchResult::Stale`] if it is no older than
    /// [`stale_grace`](EnvClient::stale_grace); otherwise the last error is
    /// returned as [`FetchResult::Failed`].
    ///
    /// Concurrent calls for the same key are not coalesced; each runs its own
    /// attempts and the newest successful write wins.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, retry_override, check), fields(key = %req.cache_key())))]
    pub async fn fetch_checked(
        &self,
        req: &FetchRequest,
        cache_mode: CacheMode,
        retry_override: Option<&RetryConfig>,
        check: PayloadCheck<'_>,
    ) -> FetchResult {
        let url = match req.url(self.base_url()) {
            Ok(u) => u,
            Err(reason) => return FetchResult::Failed { reason },
        };
        let retry = retry_override.unwrap_or_else(|| self.retry_config());

        let outcome = futures::stream::iter(0..retry.attempts())
            .fold(Attempt::Pending(None), |state, i| {
                let url = &url;
                async move {
                    let _last = match state {
                        Attempt::Done(_) => return state,
                        Attempt::Pending(last) => last,
                    };
                    if let Some(delay) = retry.delay_before(i) {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(attempt = i, ?delay, error = ?_last, "retrying after backoff");
                        self.sleeper().sleep(delay).await;
                    }
                    match self
                        .attempt(url)
                        .await
                        .and_then(|payload| check(&payload).map(|()| payload))
                    {
                        Ok(payload) => Attempt::Done(payload),
                        Err(e) => Attempt::Pending(Some(e)),
                    }
                }
            })
            .await;

        match outcome {
            Attempt::Done(payload) => {
                if cache_mode != CacheMode::Bypass {
                    self.cache()
                        .put(req.cache_key(), payload.clone(), self.clock().now())
                        .await;
                }
                FetchResult::Fresh { payload }
            }
            Attempt::Pending(last) => {
                let reason = last.unwrap_or_else(|| {
                    EnvError::InvalidParams("retry policy allowed no attempts".into())
                });
                self.fallback(req, cache_mode, reason).await
            }
        }
    }

    async fn attempt(&self, url: &Url) -> Result<serde_json::Value, EnvError> {
        let resp = self
            .http()
            .get(url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;
        crate::core::net::get_json(resp).await
    }

    async fn fallback(&self, req: &FetchRequest, cache_mode: CacheMode, reason: EnvError) -> FetchResult {
        if cache_mode == CacheMode::Bypass {
            return FetchResult::Failed { reason };
        }
        let Some(entry) = self.cache().get(req.cache_key()).await else {
            return FetchResult::Failed { reason };
        };
        if entry.age(self.clock().now()) > self.stale_grace() {
            #[cfg(feature = "tracing")]
            tracing::warn!(key = req.cache_key(), error = %reason, "cached payload too old to serve");
            return FetchResult::Failed { reason };
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(key = req.cache_key(), error = %reason, "serving stale payload");
        FetchResult::Stale {
            payload: entry.payload,
            fetched_at: entry.fetched_at,
            reason,
        }
    }
}
