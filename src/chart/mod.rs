mod prepare;

pub use prepare::prepare_chart;
use prepare::check_chart;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::client::{CacheMode, DEFAULT_CHART_HOURS, PATH_CHART_PREFIX, RetryConfig};
use crate::core::fetch::FetchRequest;
use crate::core::models::{AxisBounds, ChartKind, Freshness, MetricFamily, NamedSeries, TimeUnit};
use crate::core::{EnvClient, EnvError};
use crate::range::RangeMode;
use crate::stats::ChartStats;

/// A chart ready to hand to a renderer: ordered series, axis bounds per metric and
/// summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedChart {
    pub kind: ChartKind,
    /// Requested window.
    pub hours: u32,
    /// Suggested time-axis granularity for the window.
    pub time_unit: TimeUnit,
    /// One series per dataset, in the server's order.
    pub series: Vec<NamedSeries>,
    /// Value-axis bounds for each metric of the chart. `None` in adaptive mode when
    /// the metric has no valid sample.
    pub bounds: BTreeMap<MetricFamily, Option<AxisBounds>>,
    pub stats: ChartStats,
    pub freshness: Freshness,
}

impl PreparedChart {
    /// The series plotted for `metric`, if this chart carries it.
    #[must_use]
    pub fn series_for(&self, metric: MetricFamily) -> Option<&NamedSeries> {
        let pos = self.kind.metrics().iter().position(|m| *m == metric)?;
        self.series.get(pos)
    }
}

/// A builder for fetching and preparing one chart.
///
/// # Example
///
/// ```no_run
/// # use envdash::{ChartBuilder, ChartKind, EnvClient};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EnvClient::default();
/// let chart = ChartBuilder::new(&client, ChartKind::Co2).hours(6).fetch().await?;
/// println!("{} points, stale: {}", chart.series[0].points.len(), chart.freshness.is_stale());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ChartBuilder {
    client: EnvClient,
    kind: ChartKind,
    hours: u32,
    range_mode: Option<RangeMode>,
    reference_now: Option<DateTime<Utc>>,
    cache_mode: CacheMode,
    retry_override: Option<RetryConfig>,
}

impl ChartBuilder {
    /// Creates a builder for `kind` over the default 24-hour window.
    pub fn new(client: &EnvClient, kind: ChartKind) -> Self {
        Self {
            client: client.clone(),
            kind,
            hours: DEFAULT_CHART_HOURS,
            range_mode: None,
            reference_now: None,
            cache_mode: CacheMode::Fallback,
            retry_override: None,
        }
    }

    /// Sets the window, in hours. (Default: 24)
    #[must_use]
    pub const fn hours(mut self, hours: u32) -> Self {
        self.hours = hours;
        self
    }

    /// Overrides the client's axis-bounds mode for this chart.
    #[must_use]
    pub fn range_mode(mut self, mode: RangeMode) -> Self {
        self.range_mode = Some(mode);
        self
    }

    /// Resolves labels against this instant instead of the client's clock.
    #[must_use]
    pub const fn reference_now(mut self, now: DateTime<Utc>) -> Self {
        self.reference_now = Some(now);
        self
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

    /// The request this builder will issue.
    #[must_use]
    pub fn request(&self) -> FetchRequest {
        FetchRequest::new(format!("{PATH_CHART_PREFIX}{}", self.kind.slug()))
            .param("hours", self.hours)
    }

    /// Fetches the chart and prepares it for display.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error if every attempt failed and no usable cached
    /// payload exists, or [`EnvError::InvalidParams`] for a zero-hour window. A body
    /// that is not a chart object counts as a failed attempt and surfaces as
    /// [`EnvError::Data`] once nothing is left to fall back on.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(chart = self.kind.slug(), hours = self.hours)))]
    pub async fn fetch(self) -> Result<PreparedChart, EnvError> {
        if self.hours == 0 {
            return Err(EnvError::InvalidParams("chart window must be at least one hour".into()));
        }

        let (payload, freshness) = self
            .client
            .fetch_checked(
                &self.request(),
                self.cache_mode,
                self.retry_override.as_ref(),
                &check_chart,
            )
            .await
            .into_payload()?;

        let now = self
            .reference_now
            .unwrap_or_else(|| self.client.clock().now())
            .with_timezone(&self.client.timezone());
        let mode = self
            .range_mode
            .as_ref()
            .unwrap_or_else(|| self.client.range_mode());

        prepare_chart(self.kind, self.hours, payload, mode, &now, freshness)
    }
}
