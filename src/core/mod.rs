//! Core components of the `envdash` client.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`EnvClient`] and its builder.
//! - The primary [`EnvError`] type.
//! - The response cache and the retrying fetch loop.
//! - Shared data models like [`NamedSeries`] and [`AxisBounds`].

/// In-memory store of the last good payload per request.
pub mod cache;
/// The main client (`EnvClient`), builder, and configuration.
pub mod client;
/// Injectable time sources.
pub mod clock;
/// The primary error type (`EnvError`) for the crate.
pub mod error;
/// Requests, results and the retry loop.
pub mod fetch;
/// Shared data models used across multiple modules.
pub mod models;
pub(crate) mod net;
pub(crate) mod wire;

// convenient re-exports so most code can just `use crate::core::EnvClient`
pub use cache::{CacheEntry, CacheStats, CacheStore};
pub use client::{Backoff, CacheMode, EnvClient, EnvClientBuilder, RetryConfig};
pub use clock::{Clock, Sleeper, SystemClock, TokioSleeper};
pub use error::EnvError;
pub use fetch::{FetchRequest, FetchResult, PayloadCheck};
pub use models::{
    AxisBounds, ChartKind, Freshness, MetricFamily, NamedSeries, RawDataset, SeriesStats,
    TimeSeriesPoint, TimeUnit,
};
