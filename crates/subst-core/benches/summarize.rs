//! Criterion benchmarks for the summarizer and the local predictor.
//!
//! Result sizes span the small-result shortcut (3) up to catalog-sized
//! replies, with roughly half the entries falling below the thresholds.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use subst_common::{PredictionResult, ProductId, SubstituteEntry};
use subst_config::ScoringParams;
use subst_core::decision::ResultSummarizer;
use subst_core::predict::{Catalog, LocalPredictor, ProductRecord};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_result(n: usize) -> PredictionResult {
    let entries = (0..n)
        .map(|i| {
            let confidence = ((i * 37) % 101) as f64;
            let probability = ((i * 53) % 100) as f64 / n.max(1) as f64;
            SubstituteEntry::new(ProductId::from(i as u64 + 1), confidence, probability)
                .expect("bench entry in range")
        })
        .collect();
    PredictionResult::new(ProductId::from(0u64), entries).expect("bench result")
}

fn make_catalog(n: usize) -> Catalog {
    let records = (0..n)
        .map(|i| ProductRecord {
            code: ProductId::from(i as u64 + 1),
            market: "FOOD".to_string(),
            segment: "DAIRY".to_string(),
            category: "YOGURT".to_string(),
            family: format!("F{}", i % 4),
            brand: Some(format!("B{}", i % 7)),
            price: 1.0 + (i % 10) as f64 * 0.25,
            origin: if i % 3 == 0 { "IT" } else { "FR" }.to_string(),
            premium: i % 5 == 0,
        })
        .collect();
    Catalog::from_records(records).expect("bench catalog")
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_summarize(c: &mut Criterion) {
    let summarizer = ResultSummarizer::default();
    let mut group = c.benchmark_group("summarize");

    for size in [3usize, 10, 100, 1000] {
        let result = make_result(size);
        group.bench_with_input(BenchmarkId::new("collapsed", size), &result, |b, r| {
            b.iter(|| summarizer.summarize(black_box(r), false))
        });
        group.bench_with_input(BenchmarkId::new("show_all", size), &result, |b, r| {
            b.iter(|| summarizer.summarize(black_box(r), true))
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_predictor");

    for size in [10usize, 100, 1000] {
        let predictor = LocalPredictor::new(make_catalog(size), ScoringParams::default());
        let product = ProductId::from(1u64);
        group.bench_with_input(BenchmarkId::new("score", size), &product, |b, p| {
            b.iter(|| predictor.score(black_box(p)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_summarize, bench_predict);
criterion_main!(benches);
