use chrono::{DateTime, TimeZone};
use std::collections::BTreeMap;

use crate::core::EnvError;
use crate::core::models::{ChartKind, Freshness, TimeUnit};
use crate::core::wire::{ChartEnvelope, decode};
use crate::range::RangeMode;
use crate::series::normalize;
use crate::stats::ChartStats;

use super::PreparedChart;

/// Rejects a body that does not decode as a chart.
pub(crate) fn check_chart(payload: &serde_json::Value) -> Result<(), EnvError> {
    decode::<ChartEnvelope>(payload, "chart").map(drop)
}

/// Decodes a chart body and runs it through normalization, bounds and statistics.
///
/// # Errors
///
/// Returns [`EnvError::Data`] if the payload is not a chart object.
pub fn prepare_chart<Tz: TimeZone>(
    kind: ChartKind,
    hours: u32,
    payload: serde_json::Value,
    range_mode: &RangeMode,
    reference_now: &DateTime<Tz>,
    freshness: Freshness,
) -> Result<PreparedChart, EnvError> {
    let envelope: ChartEnvelope = decode(&payload, "chart")?;

    let series = normalize(&envelope.labels, &envelope.datasets, hours, reference_now);

    let bounds: BTreeMap<_, _> = kind
        .metrics()
        .iter()
        .enumerate()
        .map(|(i, &metric)| {
            let values = series.get(i).map(|s| s.values()).unwrap_or_default();
            (metric, range_mode.bounds(metric, &values))
        })
        .collect();

    // Statistics cover every reported sample, not only those that got a label.
    let stats = ChartStats::compute(kind, &envelope.datasets);

    Ok(PreparedChart {
        kind,
        hours,
        time_unit: TimeUnit::for_hours(hours),
        series,
        bounds,
        stats,
        freshness,
    })
}
