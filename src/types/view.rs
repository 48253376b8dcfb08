//! Display-ready view models produced by the aggregator

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::payload::ResourceSummary;
use super::report::{ChartPoint, Dimension, TrendPoint};

/// Headline cards and breakdown charts for the chargeback page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargebackView {
    pub period_days: u64,
    pub total_cost: f64,
    pub average_daily_cost: f64,
    pub by_application: Vec<ChartPoint>,
    pub by_team: Vec<ChartPoint>,
    pub by_service: Vec<ChartPoint>,
    /// Team rows sorted by total cost descending
    pub teams: Vec<TeamRow>,
    pub resources: Option<ResourceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRow {
    pub team: String,
    pub total_cost: f64,
    pub applications: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveView {
    pub key_metrics: BTreeMap<String, f64>,
    pub top_applications: Vec<ChartPoint>,
    pub by_application: Vec<ChartPoint>,
    pub by_team: Vec<ChartPoint>,
}

/// Multi-series time chart for the cost analysis page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub dimension: Dimension,
    pub rows: Vec<TrendPoint>,
    /// Series names to draw, largest total first
    pub series: Vec<String>,
    pub total_cost: f64,
}

/// A view plus the moment it was fetched
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<T> {
    pub fetched_at: DateTime<Utc>,
    pub view: T,
}

impl<T> Snapshot<T> {
    pub fn now(view: T) -> Self {
        Self {
            fetched_at: Utc::now(),
            view,
        }
    }
}
