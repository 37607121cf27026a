use chrono::{DateTime, Utc};
use serde::Serialize;

/* ----- METRICS (shared by range/, stats/, chart/) ----- */

/// One of the sensor quantities tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    /// CO₂ concentration in ppm (SCD40).
    Co2,
    /// Air temperature in °C (DHT22).
    Temperature,
    /// Relative humidity in % (DHT22).
    Humidity,
    /// VOC index (SGP41).
    Voc,
    /// NOx index (SGP41).
    Nox,
}

impl MetricFamily {
    /// Every metric family, in display order.
    pub const ALL: [Self; 5] = [
        Self::Co2,
        Self::Temperature,
        Self::Humidity,
        Self::Voc,
        Self::Nox,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Co2 => "co2",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Voc => "voc",
            Self::Nox => "nox",
        }
    }

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Co2 => "ppm",
            Self::Temperature => "°C",
            Self::Humidity => "%",
            Self::Voc | Self::Nox => "index",
        }
    }

    /// The physically plausible range; adaptive axis bounds never leave it.
    #[must_use]
    pub const fn envelope(self) -> AxisBounds {
        match self {
            Self::Co2 => AxisBounds::new(300.0, 5000.0),
            Self::Temperature => AxisBounds::new(-10.0, 60.0),
            Self::Humidity => AxisBounds::new(0.0, 100.0),
            Self::Voc | Self::Nox => AxisBounds::new(0.0, 500.0),
        }
    }
}

impl std::fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower and upper bound of a value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Minimum, maximum and mean of the valid samples of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/* ----- SERIES (shared by series/ and chart/) ----- */

/// A single sample on the time axis. `value` is `None` when the server reported
/// the reading as missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// A labelled, chronologically ordered series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub label: String,
    pub points: Vec<TimeSeriesPoint>,
}

impl NamedSeries {
    /// The raw values, in time order.
    #[must_use]
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/* ----- CHARTS ----- */

/// The charts served by the dashboard API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Co2,
    TemperatureHumidity,
    VocNox,
}

impl ChartKind {
    pub const ALL: [Self; 3] = [Self::Co2, Self::TemperatureHumidity, Self::VocNox];

    /// Path segment under `/api/chart/`.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Co2 => "co2",
            Self::TemperatureHumidity => "temperature_humidity",
            Self::VocNox => "voc_nox",
        }
    }

    /// The metric plotted by each dataset of this chart, by position.
    #[must_use]
    pub const fn metrics(self) -> &'static [MetricFamily] {
        match self {
            Self::Co2 => &[MetricFamily::Co2],
            Self::TemperatureHumidity => &[MetricFamily::Temperature, MetricFamily::Humidity],
            Self::VocNox => &[MetricFamily::Voc, MetricFamily::Nox],
        }
    }
}

/// Granularity hint for the time axis of a chart spanning `hours`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    #[must_use]
    pub const fn for_hours(hours: u32) -> Self {
        match hours {
            0..=1 => Self::Minute,
            2..=24 => Self::Hour,
            _ => Self::Day,
        }
    }
}

/// Where a returned payload came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Freshness {
    /// Fetched live by this call.
    Fresh,
    /// Every attempt failed; this is the last good payload from the cache.
    Stale {
        fetched_at: DateTime<Utc>,
        /// Display form of the last attempt's error.
        reason: String,
    },
}

impl Freshness {
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

/// A dataset as delivered by a chart endpoint: values aligned by position with the
/// payload's labels.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct RawDataset {
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "crate::core::wire::lenient_values")]
    pub data: Vec<Option<f64>>,
}
