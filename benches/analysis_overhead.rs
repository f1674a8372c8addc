//! Analysis hot-path benchmarks
//!
//! Measures the dataset scans that dominate a full analysis run: outlier
//! filtering, cross-tabulation, the two hypothesis tests, descriptive
//! statistics, and dataset fingerprinting.
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench analysis_overhead
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cribar::chi_squared::chi_squared_test;
use cribar::contingency::crosstab;
use cribar::dataset::{ColumnData, PrDataset};
use cribar::describe::column_statistics;
use cribar::filter::filter_top_percent;
use cribar::fisher::fishers_exact_test;

/// Deterministic synthetic PR dataset, sized for throughput measurement.
fn synthetic_dataset(rows: usize) -> PrDataset {
    let ids: Vec<i64> = (1..=rows as i64).collect();
    let sizes: Vec<f64> = (0..rows).map(|i| ((i * 37) % 1000) as f64 + 1.0).collect();
    let comments: Vec<f64> = (0..rows).map(|i| ((i * 13) % 250) as f64).collect();
    let reviewed: Vec<bool> = (0..rows).map(|i| i % 2 == 0).collect();
    let accepted: Vec<bool> = (0..rows).map(|i| i % 3 != 0).collect();
    let rejected: Vec<bool> = accepted.iter().map(|&a| !a).collect();

    PrDataset::new()
        .with_column("id", ColumnData::Int(ids))
        .unwrap()
        .with_column("size", ColumnData::Float(sizes))
        .unwrap()
        .with_column("comments", ColumnData::Float(comments))
        .unwrap()
        .with_column("has_review", ColumnData::Bool(reviewed))
        .unwrap()
        .with_column("accepted", ColumnData::Bool(accepted))
        .unwrap()
        .with_column("rejected", ColumnData::Bool(rejected))
        .unwrap()
}

/// Benchmark: two-column outlier filter across dataset sizes
///
/// Covers percentile computation, per-column exclusion sets and the final
/// row selection.
fn bench_filter_top_percent(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_top_percent");

    for rows in [1_000, 10_000, 100_000] {
        let dataset = synthetic_dataset(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &dataset, |b, ds| {
            b.iter(|| filter_top_percent(black_box(ds), &["size", "comments"], 10.0).unwrap());
        });
    }

    group.finish();
}

/// Benchmark: cross-tabulation of two boolean columns
fn bench_crosstab(c: &mut Criterion) {
    let dataset = synthetic_dataset(10_000);

    c.bench_function("crosstab_10k", |b| {
        b.iter(|| crosstab(black_box(&dataset), "has_review", "accepted").unwrap());
    });
}

/// Benchmark: chi-squared test end to end (crosstab + statistic + p-value)
fn bench_chi_squared(c: &mut Criterion) {
    let dataset = synthetic_dataset(10_000);

    c.bench_function("chi_squared_10k", |b| {
        b.iter(|| chi_squared_test(black_box(&dataset), "has_review").unwrap());
    });
}

/// Benchmark: Fisher's exact test end to end
///
/// The p-value sums hypergeometric terms over the whole support, so this
/// scales with the smaller margin rather than the row count.
fn bench_fishers_exact(c: &mut Criterion) {
    let dataset = synthetic_dataset(10_000);

    c.bench_function("fishers_exact_10k", |b| {
        b.iter(|| fishers_exact_test(black_box(&dataset), "has_review").unwrap());
    });
}

/// Benchmark: accepted/rejected descriptive statistics for one column
fn bench_column_statistics(c: &mut Criterion) {
    let dataset = synthetic_dataset(10_000);

    c.bench_function("column_statistics_10k", |b| {
        b.iter(|| column_statistics(black_box(&dataset), "size").unwrap());
    });
}

/// Benchmark: dataset fingerprint (canonical hash of all columns)
fn bench_fingerprint(c: &mut Criterion) {
    let dataset = synthetic_dataset(10_000);

    c.bench_function("fingerprint_10k", |b| {
        b.iter(|| black_box(dataset.fingerprint()));
    });
}

criterion_group!(
    benches,
    bench_filter_top_percent,
    bench_crosstab,
    bench_chi_squared,
    bench_fishers_exact,
    bench_column_statistics,
    bench_fingerprint,
);
criterion_main!(benches);
