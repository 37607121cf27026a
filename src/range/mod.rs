//! Value-axis bounds per metric family.

use serde::Serialize;

use crate::core::models::{AxisBounds, MetricFamily};

/// Share of the data range added above and below the extremes.
const PAD_FRACTION: f64 = 0.1;

/// Padding used when every sample is exactly zero.
const ZERO_VALUE_PAD: f64 = 1.0;

/// How value-axis bounds are chosen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RangeMode {
    /// Follow the data: padded extremes, clamped to the metric's physical envelope.
    #[default]
    Adaptive,
    /// Use the configured table verbatim, whatever the data.
    Fixed(FixedRanges),
}

impl RangeMode {
    /// Bounds for `metric` under this mode.
    ///
    /// Fixed mode always yields its configured bounds. Adaptive mode yields `None`
    /// when `values` holds no finite sample.
    #[must_use]
    pub fn bounds(&self, metric: MetricFamily, values: &[Option<f64>]) -> Option<AxisBounds> {
        match self {
            Self::Adaptive => compute_bounds(metric, values),
            Self::Fixed(table) => Some(table.get(metric)),
        }
    }
}

/// Static axis bounds per metric family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FixedRanges {
    pub co2: AxisBounds,
    pub temperature: AxisBounds,
    pub humidity: AxisBounds,
    pub voc: AxisBounds,
    pub nox: AxisBounds,
}

impl Default for FixedRanges {
    fn default() -> Self {
        Self {
            co2: AxisBounds::new(400.0, 1600.0),
            temperature: AxisBounds::new(5.0, 40.0),
            humidity: AxisBounds::new(10.0, 90.0),
            voc: AxisBounds::new(0.0, 500.0),
            nox: AxisBounds::new(0.0, 500.0),
        }
    }
}

impl FixedRanges {
    #[must_use]
    pub const fn get(&self, metric: MetricFamily) -> AxisBounds {
        match metric {
            MetricFamily::Co2 => self.co2,
            MetricFamily::Temperature => self.temperature,
            MetricFamily::Humidity => self.humidity,
            MetricFamily::Voc => self.voc,
            MetricFamily::Nox => self.nox,
        }
    }

    /// Replaces the bounds for one metric.
    #[must_use]
    pub fn with(mut self, metric: MetricFamily, bounds: AxisBounds) -> Self {
        match metric {
            MetricFamily::Co2 => self.co2 = bounds,
            MetricFamily::Temperature => self.temperature = bounds,
            MetricFamily::Humidity => self.humidity = bounds,
            MetricFamily::Voc => self.voc = bounds,
            MetricFamily::Nox => self.nox = bounds,
        }
        self
    }
}

/// Adaptive bounds for `metric`: the data extremes padded by 10% of their range and
/// clamped to [`MetricFamily::envelope`].
///
/// `None` and non-finite samples are ignored; with no samples left the result is
/// `None`. The returned bounds always satisfy `min < max`:
/// - when all samples are equal, the pad is 10% of the value's magnitude (1.0 for zero);
/// - when the data lies entirely outside the envelope, the bounds hug the nearest edge.
#[must_use]
pub fn compute_bounds(metric: MetricFamily, values: &[Option<f64>]) -> Option<AxisBounds> {
    let (min, max) = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    let range = max - min;
    let pad = if range > 0.0 {
        range * PAD_FRACTION
    } else if min != 0.0 {
        min.abs() * PAD_FRACTION
    } else {
        ZERO_VALUE_PAD
    };

    let envelope = metric.envelope();
    let lo = (min - pad).max(envelope.min);
    let hi = (max + pad).min(envelope.max);
    if lo < hi {
        return Some(AxisBounds::new(lo, hi));
    }

    let pad = pad.min(envelope.span());
    if max + pad <= envelope.min {
        Some(AxisBounds::new(envelope.min, envelope.min + pad))
    } else {
        Some(AxisBounds::new(envelope.max - pad, envelope.max))
    }
}
