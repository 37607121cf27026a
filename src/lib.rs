//! envdash: resilient client for an environmental-sensor dashboard API.
//!
//! Raw chart payloads are fetched with bounded, backed-off retries and a stale-cache
//! fallback, then turned into time-stamped series with axis bounds and summary
//! statistics, ready for an external chart renderer.
//!
//! ```no_run
//! # use envdash::{ChartBuilder, ChartKind, EnvClient, MetricFamily};
//! # #[tokio::main]
//! # async fn main() -> Result<(), envdash::EnvError> {
//! let client = EnvClient::builder()
//!     .base_url("http://raspberrypi.local:5000/".parse()?)
//!     .timezone(chrono_tz::Asia::Shanghai)
//!     .build()?;
//!
//! let chart = ChartBuilder::new(&client, ChartKind::TemperatureHumidity)
//!     .hours(6)
//!     .fetch()
//!     .await?;
//! println!("{:?}", chart.bounds[&MetricFamily::Temperature]);
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod core;
pub mod dashboard;
pub mod environment;
pub mod range;
pub mod series;
pub mod stats;
pub mod status;

pub use chart::{ChartBuilder, PreparedChart};
pub use crate::core::{
    AxisBounds, CacheMode, ChartKind, EnvClient, EnvClientBuilder, EnvError, FetchRequest,
    FetchResult, Freshness, MetricFamily, NamedSeries, RetryConfig, SeriesStats,
    TimeSeriesPoint,
};
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use environment::{EnvironmentBuilder, EnvironmentReading};
pub use range::{FixedRanges, RangeMode, compute_bounds};
pub use series::normalize;
pub use stats::{ChartStats, aggregate};
pub use status::{HealthReport, RecordStats};
