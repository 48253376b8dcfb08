//! Plain-text rendering of page views for the terminal

use std::fmt::Write;

use crate::services::PageView;
use crate::types::{ChargebackView, ChartPoint, ExecutiveView, Snapshot, TrendView};

/// Format a cost with thousands separators: `1234.5` → `$1,234.50`
pub fn format_cost(cost: f64) -> String {
    let cents = (cost * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}

pub fn render(view: &PageView) -> String {
    match view {
        PageView::Chargeback(v) => render_chargeback(v),
        PageView::Executive(v) => render_executive(v),
        PageView::Trends(v) => render_trends(v),
    }
}

pub fn render_snapshot(snapshot: &Snapshot<PageView>) -> String {
    format!(
        "[{}]\n{}",
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
        render(&snapshot.view)
    )
}

fn render_points(out: &mut String, title: &str, points: &[ChartPoint]) {
    let _ = writeln!(out, "\n{}", title);
    if points.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return;
    }
    let width = points.iter().map(|p| p.name.chars().count()).max().unwrap_or(0);
    for point in points {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>14}",
            point.name,
            format_cost(point.value),
            width = width
        );
    }
}

pub fn render_chargeback(view: &ChargebackView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Chargeback summary ({} days)", view.period_days);
    let _ = writeln!(out, "  Total cost:         {}", format_cost(view.total_cost));
    let _ = writeln!(
        out,
        "  Average daily cost: {}",
        format_cost(view.average_daily_cost)
    );

    if let Some(resources) = &view.resources {
        let _ = writeln!(
            out,
            "  Containers:         {}/{} running, {:.1}% CPU, {:.0} MB",
            resources.running_containers,
            resources.total_containers,
            resources.total_cpu_percent,
            resources.total_memory_mb
        );
    }

    render_points(&mut out, "By application", &view.by_application);
    render_points(&mut out, "By team", &view.by_team);
    render_points(&mut out, "By service", &view.by_service);

    if !view.teams.is_empty() {
        let _ = writeln!(out, "\nTeam reports");
        for team in &view.teams {
            let _ = writeln!(out, "  {}  {}", team.team, format_cost(team.total_cost));
            for app in &team.applications {
                let _ = writeln!(out, "    - {}  {}", app.name, format_cost(app.value));
            }
        }
    }
    out
}

pub fn render_executive(view: &ExecutiveView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Executive summary");
    for (name, value) in &view.key_metrics {
        let _ = writeln!(out, "  {}: {}", name, value);
    }
    render_points(&mut out, "Top applications", &view.top_applications);
    render_points(&mut out, "By application", &view.by_application);
    render_points(&mut out, "By team", &view.by_team);
    out
}

pub fn render_trends(view: &TrendView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Cost trends by {} (total {})",
        view.dimension,
        format_cost(view.total_cost)
    );
    if view.rows.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return out;
    }

    let _ = write!(out, "{:<10}", "date");
    for name in &view.series {
        let _ = write!(out, "  {:>12}", name);
    }
    let _ = writeln!(out);

    for row in &view.rows {
        let _ = write!(out, "{:<10}", row.date);
        for name in &view.series {
            let cell = row.get(name).map(format_cost).unwrap_or_else(|| "-".into());
            let _ = write!(out, "  {:>12}", cell);
        }
        let _ = writeln!(out);
    }
    out
}
