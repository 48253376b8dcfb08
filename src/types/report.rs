//! Core report types: cost records, series and chart-ready points

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use super::lenient;

/// Bucket for records whose dimension value is missing or empty
pub const UNKNOWN_KEY: &str = "Unknown";

/// Key of the date column in a serialized `TrendPoint`
pub const DATE_COLUMN: &str = "date";

/// Column name for a series in a trend row. A series named like the date
/// column is renamed to `date_series` so it cannot shadow the date.
pub fn trend_column(key: &str) -> Cow<'_, str> {
    if key == DATE_COLUMN {
        Cow::Owned(format!("{}_series", DATE_COLUMN))
    } else {
        Cow::Borrowed(key)
    }
}

/// Grouping key for cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Application,
    Team,
    Service,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Application => "application",
            Dimension::Team => "team",
            Dimension::Service => "service",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cost record as produced by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostRecord {
    /// Day in `YYYY-MM-DD` form
    #[serde(default, deserialize_with = "lenient::de_label")]
    pub date: String,
    #[serde(
        default,
        deserialize_with = "lenient::de_opt_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub application: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::de_opt_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub team: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::de_opt_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub service: Option<String>,
    #[serde(default, alias = "total_cost", deserialize_with = "lenient::de_cost")]
    pub cost: f64,
}

impl CostRecord {
    /// Value of this record for a dimension, if present and non-empty
    pub fn dimension_value(&self, dimension: Dimension) -> Option<&str> {
        let value = match dimension {
            Dimension::Application => self.application.as_deref(),
            Dimension::Team => self.team.as_deref(),
            Dimension::Service => self.service.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Key used when grouping by `dimension` (missing → "Unknown")
    pub fn dimension_key(&self, dimension: Dimension) -> &str {
        self.dimension_value(dimension).unwrap_or(UNKNOWN_KEY)
    }
}

/// Mapping from dimension value to summed cost.
///
/// Keys keep first-seen order so that stable sorts break ties the same way
/// on every call. Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct AggregatedSeries {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl AggregatedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `cost` to `key`, inserting it if new
    pub fn add(&mut self, key: &str, cost: f64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += cost,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), cost));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl PartialEq for AggregatedSeries {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: AsRef<str>> FromIterator<(K, f64)> for AggregatedSeries {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut series = Self::new();
        for (key, cost) in iter {
            series.add(key.as_ref(), cost);
        }
        series
    }
}

impl Serialize for AggregatedSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

/// Backend breakdown objects (`{"web": 12.5, ...}`) decode leniently:
/// values go through the cost rules, non-objects become an empty series.
impl<'de> Deserialize<'de> for AggregatedSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| (k.as_str(), lenient::cost_from_value(v)))
                .collect(),
            _ => Self::new(),
        })
    }
}

/// A labelled value for bar/pie charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One row of a multi-series time chart: a date plus one column per
/// dimension value. Serializes flat, e.g. `{"date":"2024-01-01","A":10}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendPoint {
    pub date: String,
    pub values: AggregatedSeries,
}

impl TrendPoint {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            values: AggregatedSeries::new(),
        }
    }

    /// Cost for one series on this date (absent → `None`)
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key)
    }
}

impl Serialize for TrendPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(DATE_COLUMN, &self.date)?;
        for (key, value) in self.values.iter() {
            map.serialize_entry(trend_column(key).as_ref(), &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dimension_key_falls_back_to_unknown() {
        let record = CostRecord {
            date: "2024-01-01".into(),
            team: Some("  ".into()),
            cost: 1.0,
            ..Default::default()
        };
        assert_eq!(record.dimension_key(Dimension::Team), UNKNOWN_KEY);
        assert_eq!(record.dimension_key(Dimension::Application), UNKNOWN_KEY);
    }

    #[test]
    fn test_cost_record_lenient_decode() {
        let record: CostRecord = serde_json::from_value(json!({
            "date": "2024-01-02",
            "team": "A",
            "cost": "7.5",
            "application": null
        }))
        .unwrap();
        assert_eq!(record.date, "2024-01-02");
        assert_eq!(record.team.as_deref(), Some("A"));
        assert!(record.application.is_none());
        assert_eq!(record.cost, 7.5);
    }

    #[test]
    fn test_cost_record_total_cost_alias() {
        let record: CostRecord =
            serde_json::from_value(json!({"date": "2024-01-02", "total_cost": 3})).unwrap();
        assert_eq!(record.cost, 3.0);
    }

    #[test]
    fn test_series_add_accumulates_in_first_seen_order() {
        let mut series = AggregatedSeries::new();
        series.add("b", 1.0);
        series.add("a", 2.0);
        series.add("b", 4.0);

        let entries: Vec<(&str, f64)> = series.iter().collect();
        assert_eq!(entries, vec![("b", 5.0), ("a", 2.0)]);
    }

    #[test]
    fn test_series_equality_ignores_order() {
        let left: AggregatedSeries = [("A", 17.0), ("B", 5.0)].into_iter().collect();
        let right: AggregatedSeries = [("B", 5.0), ("A", 17.0)].into_iter().collect();
        assert_eq!(left, right);

        let different: AggregatedSeries = [("A", 17.0)].into_iter().collect();
        assert_ne!(left, different);
    }

    #[test]
    fn test_series_decode_from_object() {
        let series: AggregatedSeries =
            serde_json::from_value(json!({"web": 12.5, "db": "3", "cache": null})).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.get("web"), Some(12.5));
        assert_eq!(series.get("db"), Some(3.0));
        assert_eq!(series.get("cache"), Some(0.0));
    }

    #[test]
    fn test_series_decode_from_non_object() {
        let series: AggregatedSeries = serde_json::from_value(json!([1, 2])).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_trend_point_serializes_flat() {
        let mut point = TrendPoint::new("2024-01-01");
        point.values.add("A", 10.0);
        point.values.add("B", 5.0);

        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(value, json!({"date": "2024-01-01", "A": 10.0, "B": 5.0}));
    }

    #[test]
    fn test_trend_point_series_named_date_keeps_date_column() {
        let mut point = TrendPoint::new("2024-01-01");
        point.values.add("date", 3.0);

        let text = serde_json::to_string(&point).unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed["date"], "2024-01-01");
        assert_eq!(reparsed["date_series"], 3.0);
    }

    #[test]
    fn test_trend_column() {
        assert_eq!(trend_column("web"), "web");
        assert_eq!(trend_column("date"), "date_series");
    }

    #[test]
    fn test_series_decode_keeps_key_order() {
        let series: AggregatedSeries =
            serde_json::from_str(r#"{"zeta": 5, "alpha": 5, "mid": 5}"#).unwrap();
        let keys: Vec<&str> = series.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(Dimension::Service.to_string(), "service");
        let parsed: Dimension = serde_json::from_value(json!("team")).unwrap();
        assert_eq!(parsed, Dimension::Team);
    }
}
