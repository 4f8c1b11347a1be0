//! Benchmarks for log filtering and refresh application
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use foodlens::*;

const DISHES: [&str; 6] = ["pizza", "caesar_salad", "ramen", "pad_thai", "apple_pie", "sushi"];

fn create_test_entries(count: usize) -> Vec<FoodLogEntry> {
    (0..count)
        .map(|i| FoodLogEntry {
            id: i as i64,
            food_name: DISHES[i % DISHES.len()].to_string(),
            confidence: 0.5 + (i % 50) as f64 / 100.0,
            weight: Some(WEIGHT_OPTIONS[i % WEIGHT_OPTIONS.len()]),
            nutrition: Nutrition::new(250.0, 10.0, 30.0, 9.0),
            timestamp: None,
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in [100, 1000, 10000] {
        let entries = create_test_entries(size);
        group.throughput(Throughput::Elements(size as u64));

        let search = FilterState::new("PIZ", WeightFilter::All);
        group.bench_function(format!("search_{}", size), |b| {
            b.iter(|| search.apply(black_box(&entries)).len())
        });

        let combined = FilterState::new("a", WeightFilter::Grams(200));
        group.bench_function(format!("search_and_weight_{}", size), |b| {
            b.iter(|| combined.apply(black_box(&entries)).len())
        });
    }

    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh");
    let entries = create_test_entries(1000);

    group.bench_function("complete_refresh_1000", |b| {
        let mut sync = LogListSync::new();
        sync.set_search("ramen");
        b.iter(|| {
            let ticket = sync.begin_refresh();
            sync.complete_refresh(ticket, Ok(black_box(entries.clone())))
        });
    });

    group.bench_function("reorder_visible_1000", |b| {
        let mut sync = LogListSync::new();
        let ticket = sync.begin_refresh();
        sync.complete_refresh(ticket, Ok(entries.clone()));
        b.iter(|| sync.reorder_visible(black_box(0), black_box(500)));
    });

    group.finish();
}

criterion_group!(benches, bench_filter, bench_refresh);
criterion_main!(benches);
