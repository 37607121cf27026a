//! Record counters and service health.

use serde::Serialize;

use crate::core::client::{CacheMode, PATH_HEALTH, PATH_STATS, RetryConfig};
use crate::core::fetch::FetchRequest;
use crate::core::wire::{HealthEnvelope, StatsEnvelope, decode};
use crate::core::{EnvClient, EnvError};

/// Database record counters from `/api/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    pub total_records: u64,
    pub recent_24h_records: Option<u64>,
}

impl RecordStats {
    fn from_payload(payload: &serde_json::Value) -> Result<Self, EnvError> {
        let stats = decode::<StatsEnvelope>(payload, "stats")?
            .stats
            .ok_or_else(|| EnvError::Data("missing stats".into()))?;
        Ok(Self {
            total_records: stats
                .total_records
                .ok_or_else(|| EnvError::Data("missing stats.total_records".into()))?,
            recent_24h_records: stats.recent_24h_records,
        })
    }
}

/// Service health from `/api/health`. The body beyond `status` is server-defined
/// and kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    /// `"healthy"`, `"degraded"` or `"unhealthy"` on current servers.
    pub status: Option<String>,
    pub raw: serde_json::Value,
}

impl HealthReport {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some("healthy")
    }
}

impl EnvClient {
    /// Fetches the record counters.
    ///
    /// Counters are informational, so this makes a single attempt and never touches
    /// the cache.
    ///
    /// # Errors
    ///
    /// Returns the attempt's error, or [`EnvError::Data`] if `stats.total_records`
    /// is missing.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn record_stats(&self) -> Result<RecordStats, EnvError> {
        let (payload, _) = self
            .fetch_checked(
                &FetchRequest::new(PATH_STATS),
                CacheMode::Bypass,
                Some(&RetryConfig::disabled()),
                &|v| RecordStats::from_payload(v).map(drop),
            )
            .await
            .into_payload()?;
        RecordStats::from_payload(&payload)
    }

    /// Fetches the service health, with the client's retry policy and no caching.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error if every attempt failed.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn health(&self) -> Result<HealthReport, EnvError> {
        let (raw, _) = self
            .fetch(&FetchRequest::new(PATH_HEALTH), CacheMode::Bypass, None)
            .await
            .into_payload()?;
        let status = decode::<HealthEnvelope>(&raw, "health")
            .ok()
            .and_then(|h| h.status);
        Ok(HealthReport { status, raw })
    }
}
