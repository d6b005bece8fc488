//! Benchmarks the two passes most exposed to graph size: cycle enumeration
//! and shell-chain discovery, on a synthetic large batch built to exercise
//! both a hub-anchored ring and a long layering chain.

use chrono::{DateTime, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mule_ring_detector::{
    AccountClassifier, CycleFinder, DetectionConfig, ShellChainFinder, Transaction, TxBatch,
};

fn ts(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

/// A batch of `hub_count` disjoint triangles plus one long shell chain,
/// scaled by `size`: each triangle contributes 3 accounts and 3 edges, so
/// the graph stays sparse the way a real transaction graph is, rather than
/// a dense synthetic worst case the caps aren't meant to protect against.
fn synthetic_batch(size: usize) -> Vec<Transaction> {
    let mut txs = Vec::with_capacity(size * 3 + 50);
    let mut seconds = 0;

    for i in 0..size {
        let a = format!("HUB{i}-A");
        let b = format!("HUB{i}-B");
        let c = format!("HUB{i}-C");
        txs.push(Transaction::new(format!("tri{i}-1"), a.clone(), b.clone(), 500.0, ts(seconds)));
        seconds += 1;
        txs.push(Transaction::new(format!("tri{i}-2"), b, c.clone(), 500.0, ts(seconds)));
        seconds += 1;
        txs.push(Transaction::new(format!("tri{i}-3"), c, a, 500.0, ts(seconds)));
        seconds += 1;
    }

    // One long shell chain layered through low-activity intermediaries.
    let mut prev = "CHAIN-0".to_string();
    for hop in 1..=40 {
        let next = format!("CHAIN-{hop}");
        txs.push(Transaction::new(
            format!("chain-{hop}"),
            prev.clone(),
            next.clone(),
            1000.0,
            ts(seconds),
        ));
        seconds += 1;
        prev = next;
    }

    txs
}

fn bench_cycle_finder(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_finder");

    for size in [100usize, 1_000, 5_000].iter() {
        let batch = TxBatch::from_transactions(synthetic_batch(*size));
        let config = DetectionConfig::default();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let finder = CycleFinder::new(&batch, &config);
                black_box(finder.find(None).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_shell_chain_finder(c: &mut Criterion) {
    let mut group = c.benchmark_group("shell_chain_finder");

    for size in [100usize, 1_000, 5_000].iter() {
        let batch = TxBatch::from_transactions(synthetic_batch(*size));
        let config = DetectionConfig::default();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let finder = ShellChainFinder::new(&batch, &config);
                black_box(finder.find(None).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_account_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("account_classifier");

    for size in [100usize, 1_000, 5_000].iter() {
        let batch = TxBatch::from_transactions(synthetic_batch(*size));

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let classifier = AccountClassifier::new(&batch, 3);
                black_box(classifier.classify_all())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_cycle_finder,
    bench_shell_chain_finder,
    bench_account_classifier
);
criterion_main!(benches);
