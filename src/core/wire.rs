use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::core::EnvError;
use crate::core::models::RawDataset;

/// Decodes `payload` into an envelope; a shape mismatch is [`EnvError::Data`].
pub(crate) fn decode<T: DeserializeOwned>(
    payload: &serde_json::Value,
    what: &str,
) -> Result<T, EnvError> {
    T::deserialize(payload).map_err(|e| EnvError::Data(format!("{what} payload: {e}")))
}

/* ----- /api/chart/<kind> ----- */

#[derive(Deserialize)]
pub(crate) struct ChartEnvelope {
    #[serde(default)]
    pub(crate) labels: Vec<String>,
    #[serde(default)]
    pub(crate) datasets: Vec<RawDataset>,
}

/* ----- /api/environment ----- */

#[derive(Deserialize)]
pub(crate) struct EnvironmentEnvelope {
    #[serde(default)]
    pub(crate) timestamp: Option<i64>,
    #[serde(default)]
    pub(crate) sensors: SensorsNode,
}

#[derive(Deserialize, Default)]
pub(crate) struct SensorsNode {
    #[serde(default)]
    pub(crate) scd40: Option<Scd40Node>,
    #[serde(default)]
    pub(crate) dht22: Option<Dht22Node>,
    #[serde(default)]
    pub(crate) sgp41: Option<Sgp41Node>,
}

#[derive(Deserialize)]
pub(crate) struct Scd40Node {
    #[serde(default, deserialize_with = "lenient_number")]
    pub(crate) co2: Option<f64>,
    #[serde(default)]
    pub(crate) status: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct Dht22Node {
    #[serde(default, deserialize_with = "lenient_number")]
    pub(crate) temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub(crate) humidity: Option<f64>,
    #[serde(default)]
    pub(crate) status: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct Sgp41Node {
    #[serde(default, deserialize_with = "lenient_number")]
    pub(crate) voc_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub(crate) nox_index: Option<f64>,
    #[serde(default)]
    pub(crate) status: Option<String>,
}

/* ----- /api/stats and /api/health ----- */

#[derive(Deserialize)]
pub(crate) struct StatsEnvelope {
    pub(crate) stats: Option<StatsNode>,
}

#[derive(Deserialize)]
pub(crate) struct StatsNode {
    pub(crate) total_records: Option<u64>,
    #[serde(default)]
    pub(crate) recent_24h_records: Option<u64>,
}

#[derive(Deserialize)]
pub(crate) struct HealthEnvelope {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

/* ----- lenient numeric decoding ----- */

/// A sample the sensor could not deliver shows up as `null`, a string like `"NaN"`,
/// or some other junk. None of these may fail the payload, so anything that is not
/// a finite number becomes `None`.
fn value_to_f64(v: &serde_json::Value) -> Option<f64> {
    match v {
        serde_json::Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

pub(crate) fn lenient_values<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(value_to_f64)
        .collect())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(value_to_f64))
}
