//! Current readings from every sensor.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::client::{CacheMode, PATH_ENVIRONMENT, RetryConfig};
use crate::core::fetch::FetchRequest;
use crate::core::models::Freshness;
use crate::core::wire::{EnvironmentEnvelope, decode};
use crate::core::{EnvClient, EnvError};

/// SCD40 CO₂ sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Co2Reading {
    pub co2: Option<f64>,
    pub status: Option<String>,
}

/// DHT22 temperature and humidity sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub status: Option<String>,
}

/// SGP41 VOC/NOx sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasIndexReading {
    pub voc_index: Option<f64>,
    pub nox_index: Option<f64>,
    pub status: Option<String>,
}

/// One snapshot of `/api/environment`. A sensor absent from the payload is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentReading {
    /// When the server took the readings.
    pub timestamp: Option<DateTime<Utc>>,
    pub scd40: Option<Co2Reading>,
    pub dht22: Option<ClimateReading>,
    pub sgp41: Option<GasIndexReading>,
    pub freshness: Freshness,
}

impl EnvironmentReading {
    pub(crate) fn from_payload(
        payload: &serde_json::Value,
        freshness: Freshness,
    ) -> Result<Self, EnvError> {
        let env: EnvironmentEnvelope = decode(payload, "environment")?;
        let sensors = env.sensors;
        Ok(Self {
            timestamp: env
                .timestamp
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
            scd40: sensors.scd40.map(|n| Co2Reading {
                co2: n.co2,
                status: n.status,
            }),
            dht22: sensors.dht22.map(|n| ClimateReading {
                temperature: n.temperature,
                humidity: n.humidity,
                status: n.status,
            }),
            sgp41: sensors.sgp41.map(|n| GasIndexReading {
                voc_index: n.voc_index,
                nox_index: n.nox_index,
                status: n.status,
            }),
            freshness,
        })
    }
}

/// A builder for fetching the current sensor readings.
#[derive(Clone)]
pub struct EnvironmentBuilder {
    client: EnvClient,
    cache_mode: CacheMode,
    retry_override: Option<RetryConfig>,
}

impl EnvironmentBuilder {
    pub fn new(client: &EnvClient) -> Self {
        Self {
            client: client.clone(),
            cache_mode: CacheMode::Fallback,
            retry_override: None,
        }
    }

    /// Sets the cache mode for this specific API call.
    #[must_use]
    pub const fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Overrides the default retry policy for this specific API call.
    #[must_use]
    pub fn retry_policy(mut self, cfg: Option<RetryConfig>) -> Self {
        self.retry_override = cfg;
        self
    }

    /// Fetches the readings.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error if every attempt failed and no usable cached
    /// payload exists. A body with the wrong shape counts as a failed attempt.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn fetch(self) -> Result<EnvironmentReading, EnvError> {
        let (payload, freshness) = self
            .client
            .fetch_checked(
                &FetchRequest::new(PATH_ENVIRONMENT),
                self.cache_mode,
                self.retry_override.as_ref(),
                &|v| decode::<EnvironmentEnvelope>(v, "environment").map(drop),
            )
            .await
            .into_payload()?;
        EnvironmentReading::from_payload(&payload, freshness)
    }
}
