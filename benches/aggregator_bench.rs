//! Criterion benchmarks for the report aggregator

use chargeview::services::Aggregator;
use chargeview::types::{decode_report, CostRecord, CostTrends, Dimension};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

/// Synthetic trend records: `days` days × `apps` applications spread over 8 teams
fn make_records(days: u32, apps: u32) -> Vec<CostRecord> {
    (0..days)
        .flat_map(|day| {
            (0..apps).map(move |app| CostRecord {
                date: format!("2024-{:02}-{:02}", 1 + day / 28, 1 + day % 28),
                application: Some(format!("app-{}", app)),
                team: Some(format!("team-{}", app % 8)),
                service: Some(if app % 3 == 0 { "storage" } else { "compute" }.to_string()),
                cost: f64::from(app * 7 % 13) + f64::from(day) * 0.01,
            })
        })
        .collect()
}

fn bench_group_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator");

    for &(days, apps) in &[(30, 20), (90, 200), (365, 500)] {
        let records = make_records(days, apps);
        group.throughput(Throughput::Elements(records.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("group_cost_by", records.len()),
            &records,
            |b, records| {
                b.iter(|| Aggregator::group_cost_by(black_box(records), Dimension::Application));
            },
        );

        let series = Aggregator::group_cost_by(&records, Dimension::Application);
        group.bench_with_input(
            BenchmarkId::new("to_chart_points_top10", records.len()),
            &series,
            |b, series| {
                b.iter(|| Aggregator::to_chart_points(black_box(series), Some(10)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("pivot_trends", records.len()),
            &records,
            |b, records| {
                b.iter(|| Aggregator::pivot_trends(black_box(records), Dimension::Team));
            },
        );
    }

    group.finish();
}

fn bench_decode_trends(c: &mut Criterion) {
    let payload = serde_json::to_vec(&CostTrends {
        trends: make_records(90, 200),
    })
    .unwrap_or_default();

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.sample_size(20);

    group.bench_function("cost_trends", |b| {
        b.iter(|| {
            let mut body = payload.clone();
            let _: Result<CostTrends, _> = decode_report(black_box(&mut body));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_group_and_sort, bench_decode_trends);
criterion_main!(benches);
