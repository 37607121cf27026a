//! Summary statistics per dataset.

use serde::Serialize;

use crate::core::models::{ChartKind, RawDataset, SeriesStats};

/// Min, max and mean of the finite samples in `values`; `None` if there are none.
#[must_use]
pub fn aggregate(values: &[Option<f64>]) -> Option<SeriesStats> {
    let mut valid = values.iter().flatten().copied().filter(|v| v.is_finite());
    let first = valid.next()?;
    let (mut min, mut max, mut sum, mut count) = (first, first, first, 1_u32);
    for v in valid {
        min = min.min(v);
        max = max.max(v);
        sum += v;
        count += 1;
    }
    Some(SeriesStats {
        min,
        max,
        avg: sum / f64::from(count),
    })
}

/// Per-metric statistics for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ChartStats {
    Co2 {
        co2: Option<SeriesStats>,
    },
    TemperatureHumidity {
        temperature: Option<SeriesStats>,
        humidity: Option<SeriesStats>,
    },
    VocNox {
        voc: Option<SeriesStats>,
        nox: Option<SeriesStats>,
    },
}

impl ChartStats {
    /// Aggregates each dataset independently; dataset `i` belongs to
    /// `kind.metrics()[i]`. A missing dataset yields `None` for its metric.
    #[must_use]
    pub fn compute(kind: ChartKind, datasets: &[RawDataset]) -> Self {
        let nth = |i: usize| datasets.get(i).and_then(|d| aggregate(&d.data));
        match kind {
            ChartKind::Co2 => Self::Co2 { co2: nth(0) },
            ChartKind::TemperatureHumidity => Self::TemperatureHumidity {
                temperature: nth(0),
                humidity: nth(1),
            },
            ChartKind::VocNox => Self::VocNox {
                voc: nth(0),
                nox: nth(1),
            },
        }
    }
}
