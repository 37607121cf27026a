//! Concurrent refresh of everything a dashboard shows.

use futures::future::join_all;
use std::collections::HashMap;

use crate::chart::{ChartBuilder, PreparedChart};
use crate::core::client::DEFAULT_CHART_HOURS;
use crate::core::models::ChartKind;
use crate::core::{EnvClient, EnvError};
use crate::environment::{EnvironmentBuilder, EnvironmentReading};
use crate::status::RecordStats;

/// Outcome of one [`Dashboard::refresh`]. Each part succeeds or fails on its own.
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub environment: Result<EnvironmentReading, EnvError>,
    /// One entry per chart kind, in [`ChartKind::ALL`] order.
    pub charts: Vec<(ChartKind, Result<PreparedChart, EnvError>)>,
    pub record_stats: Result<RecordStats, EnvError>,
}

impl DashboardSnapshot {
    #[must_use]
    pub fn chart(&self, kind: ChartKind) -> Option<&Result<PreparedChart, EnvError>> {
        self.charts.iter().find(|(k, _)| *k == kind).map(|(_, r)| r)
    }
}

/// The set of requests behind one dashboard screen.
///
/// Each refresh issues every request concurrently; completions race freely and a
/// failure in one does not affect the others.
#[derive(Clone)]
pub struct Dashboard {
    client: EnvClient,
    hours: HashMap<ChartKind, u32>,
}

impl Dashboard {
    pub fn new(client: &EnvClient) -> Self {
        Self {
            client: client.clone(),
            hours: HashMap::new(),
        }
    }

    /// Sets the window for one chart. (Default: 24)
    #[must_use]
    pub fn hours(mut self, kind: ChartKind, hours: u32) -> Self {
        self.hours.insert(kind, hours);
        self
    }

    #[must_use]
    pub fn hours_for(&self, kind: ChartKind) -> u32 {
        self.hours.get(&kind).copied().unwrap_or(DEFAULT_CHART_HOURS)
    }

    /// Fetches the current readings, every chart and the record counters.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn refresh(&self) -> DashboardSnapshot {
        let charts = join_all(ChartKind::ALL.into_iter().map(|kind| {
            let builder = ChartBuilder::new(&self.client, kind).hours(self.hours_for(kind));
            async move { (kind, builder.fetch().await) }
        }));

        let (environment, charts, record_stats) = futures::join!(
            EnvironmentBuilder::new(&self.client).fetch(),
            charts,
            self.client.record_stats(),
        );

        DashboardSnapshot {
            environment,
            charts,
            record_stats,
        }
    }
}
