//! Aggregator service for shaping report payloads into chart-ready series
//!
//! Everything here is pure: no I/O, no shared state, input is never mutated.
//! Malformed values were already neutralized at decode time; the aggregator
//! still clamps non-finite costs so hand-built records cannot produce NaN.

use crate::types::lenient::sanitize_cost;
use crate::types::{
    trend_column, AggregatedSeries, ChargebackSummary, ChargebackView, ChartPoint, CostRecord,
    CostTrends, Dimension, ExecutiveSummary, ExecutiveView, TeamRow, TrendPoint, TrendView,
    UNKNOWN_KEY,
};
use std::collections::HashMap;

/// Top applications shown on the executive page
pub const EXECUTIVE_TOP_N: usize = 5;
/// Slices per breakdown chart on the chargeback page
pub const CHARGEBACK_TOP_N: usize = 8;
/// Series drawn on the cost analysis trend chart
pub const TREND_TOP_N: usize = 10;

/// Aggregator for cost report data
pub struct Aggregator;

impl Aggregator {
    /// Sum cost per distinct dimension value (missing → "Unknown")
    pub fn group_cost_by(records: &[CostRecord], dimension: Dimension) -> AggregatedSeries {
        let mut series = AggregatedSeries::new();
        for record in records {
            series.add(record.dimension_key(dimension), sanitize_cost(record.cost));
        }
        series
    }

    /// Convert a series to chart points sorted by value descending.
    ///
    /// The sort is stable, so ties keep series order. With `top_n`, the tail
    /// is dropped without being folded into any bucket.
    pub fn to_chart_points(series: &AggregatedSeries, top_n: Option<usize>) -> Vec<ChartPoint> {
        let mut points: Vec<ChartPoint> = series
            .iter()
            .map(|(name, value)| ChartPoint::new(name, value))
            .collect();
        sort_descending(&mut points);
        if let Some(n) = top_n {
            points.truncate(n);
        }
        points
    }

    /// Pivot records into one row per date with one column per dimension
    /// value, rows sorted ascending by date.
    ///
    /// Dates are `YYYY-MM-DD`, so string order is date order. Records without
    /// a date cannot be placed on the time axis and are left out. Columns are
    /// named by `trend_column`.
    pub fn pivot_trends(records: &[CostRecord], dimension: Dimension) -> Vec<TrendPoint> {
        let mut row_index: HashMap<&str, usize> = HashMap::new();
        let mut rows: Vec<TrendPoint> = Vec::new();

        for record in records {
            let date = record.date.trim();
            if date.is_empty() {
                continue;
            }
            let i = *row_index.entry(date).or_insert_with(|| {
                rows.push(TrendPoint::new(date));
                rows.len() - 1
            });
            let column = trend_column(record.dimension_key(dimension));
            rows[i].values.add(&column, sanitize_cost(record.cost));
        }

        rows.sort_by(|a, b| a.date.cmp(&b.date));
        rows
    }

    /// Sum of all values in a series; `0.0` when empty
    pub fn compute_totals(series: &AggregatedSeries) -> f64 {
        series
            .iter()
            .map(|(_, value)| value)
            .filter(|value| value.is_finite())
            .sum()
    }

    /// Divide, yielding `0.0` instead of NaN or infinity
    pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
        if denominator == 0.0 {
            return 0.0;
        }
        let quotient = numerator / denominator;
        if quotient.is_finite() {
            quotient
        } else {
            0.0
        }
    }

    /// Build the chargeback page view
    pub fn chargeback_view(summary: &ChargebackSummary, top_n: usize) -> ChargebackView {
        let data = &summary.cost_data;

        let total_cost = data.total_cost.unwrap_or_else(|| {
            [&data.cost_by_application, &data.cost_by_team, &data.cost_by_service]
                .into_iter()
                .find(|series| !series.is_empty())
                .map(Self::compute_totals)
                .unwrap_or(0.0)
        });

        let average_daily_cost = data
            .average_daily_cost
            .unwrap_or_else(|| Self::safe_divide(total_cost, summary.period_days as f64));

        let mut teams: Vec<TeamRow> = summary
            .team_reports
            .iter()
            .map(|report| {
                let total_cost = if report.total_cost > 0.0 {
                    report.total_cost
                } else {
                    Self::compute_totals(&report.cost_by_application)
                };
                TeamRow {
                    team: label_or_unknown(&report.team_name),
                    total_cost,
                    applications: Self::to_chart_points(&report.cost_by_application, Some(top_n)),
                }
            })
            .collect();
        teams.sort_by(|a, b| {
            b.total_cost
                .partial_cmp(&a.total_cost)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        ChargebackView {
            period_days: summary.period_days,
            total_cost,
            average_daily_cost,
            by_application: Self::to_chart_points(&data.cost_by_application, Some(top_n)),
            by_team: Self::to_chart_points(&data.cost_by_team, Some(top_n)),
            by_service: Self::to_chart_points(&data.cost_by_service, Some(top_n)),
            teams,
            resources: summary.resource_summary.clone(),
        }
    }

    /// Build the executive summary view
    pub fn executive_view(summary: &ExecutiveSummary, top_n: usize) -> ExecutiveView {
        let mut top_applications: Vec<ChartPoint> = summary
            .top_applications
            .iter()
            .map(|app| ChartPoint::new(label_or_unknown(&app.name), sanitize_cost(app.cost)))
            .collect();
        sort_descending(&mut top_applications);
        top_applications.truncate(top_n);

        ExecutiveView {
            key_metrics: summary.key_metrics.clone(),
            top_applications,
            by_application: Self::to_chart_points(
                &summary.cost_breakdown.by_application,
                Some(top_n),
            ),
            by_team: Self::to_chart_points(&summary.cost_breakdown.by_team, Some(top_n)),
        }
    }

    /// Build the cost analysis trend view
    pub fn trend_view(trends: &CostTrends, dimension: Dimension, top_n: usize) -> TrendView {
        let totals = Self::group_cost_by(&trends.trends, dimension);
        let series = Self::to_chart_points(&totals, Some(top_n))
            .into_iter()
            .map(|point| trend_column(&point.name).into_owned())
            .collect();

        TrendView {
            dimension,
            rows: Self::pivot_trends(&trends.trends, dimension),
            series,
            total_cost: Self::compute_totals(&totals),
        }
    }
}

fn sort_descending(points: &mut [ChartPoint]) {
    points.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn label_or_unknown(label: &str) -> String {
    if label.trim().is_empty() {
        UNKNOWN_KEY.to_string()
    } else {
        label.to_string()
    }
}
