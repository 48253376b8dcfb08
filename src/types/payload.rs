//! Per-endpoint response types
//!
//! Each backend endpoint gets its own explicit type. Decoding happens once at
//! the HTTP boundary; every field is lenient so a partial payload still
//! produces a usable report.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::lenient;
use super::report::{AggregatedSeries, CostRecord};
use super::{ChargeviewError, Result};

/// `GET /api/chargeback/summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargebackSummary {
    #[serde(default, deserialize_with = "lenient::de_count")]
    pub period_days: u64,
    #[serde(default, deserialize_with = "lenient::de_object")]
    pub cost_data: CostData,
    #[serde(default, deserialize_with = "lenient::de_list")]
    pub team_reports: Vec<TeamReport>,
    #[serde(default, deserialize_with = "lenient::de_opt_object")]
    pub resource_summary: Option<ResourceSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostData {
    /// Absent when the backend did not compute it; the aggregator falls back
    /// to summing the first non-empty breakdown.
    #[serde(default, deserialize_with = "lenient::de_opt_cost")]
    pub total_cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient::de_opt_cost")]
    pub average_daily_cost: Option<f64>,
    #[serde(default)]
    pub cost_by_application: AggregatedSeries,
    #[serde(default)]
    pub cost_by_team: AggregatedSeries,
    #[serde(default)]
    pub cost_by_service: AggregatedSeries,
}

/// Per-team chargeback row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    #[serde(default, alias = "team", deserialize_with = "lenient::de_label")]
    pub team_name: String,
    #[serde(default, deserialize_with = "lenient::de_cost")]
    pub total_cost: f64,
    #[serde(default)]
    pub cost_by_application: AggregatedSeries,
}

/// Container resource counters shown beside the chargeback cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    #[serde(default, deserialize_with = "lenient::de_count")]
    pub total_containers: u64,
    #[serde(default, deserialize_with = "lenient::de_count")]
    pub running_containers: u64,
    #[serde(default, deserialize_with = "lenient::de_cost")]
    pub total_cpu_percent: f64,
    #[serde(default, deserialize_with = "lenient::de_cost")]
    pub total_memory_mb: f64,
}

/// `GET /api/executive/summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    #[serde(default, deserialize_with = "de_metrics")]
    pub key_metrics: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "lenient::de_list")]
    pub top_applications: Vec<ApplicationCost>,
    #[serde(default, deserialize_with = "lenient::de_object")]
    pub cost_breakdown: CostBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCost {
    #[serde(default, alias = "application", deserialize_with = "lenient::de_label")]
    pub name: String,
    #[serde(default, alias = "total_cost", deserialize_with = "lenient::de_cost")]
    pub cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(default)]
    pub by_application: AggregatedSeries,
    #[serde(default)]
    pub by_team: AggregatedSeries,
}

/// `GET /api/cost/trends`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTrends {
    #[serde(default, deserialize_with = "lenient::de_list")]
    pub trends: Vec<CostRecord>,
}

/// Key metrics keep only numeric entries; labels and nested objects are
/// display concerns the aggregator does not use.
fn de_metrics<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(k, v)| {
                let parsed = match &v {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                parsed.filter(|f| f.is_finite()).map(|f| (k, f))
            })
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// Decode a response body into one of the report types.
///
/// The body must be a JSON object; anything below the top level is lenient.
pub fn decode_report<T>(body: &mut [u8]) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let value: Value = simd_json::from_slice(body)
        .map_err(|e| ChargeviewError::Decode(format!("invalid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(ChargeviewError::Decode(
            "expected a JSON object at the top level".into(),
        ));
    }
    serde_json::from_value(value).map_err(|e| ChargeviewError::Decode(e.to_string()))
}
