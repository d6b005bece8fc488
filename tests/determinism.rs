//! Determinism and permutation-invariance properties (§8).
//!
//! Two runs on the same input, and a run on a timestamp-preserving
//! permutation of the input, must produce byte-identical envelopes modulo
//! `processing_time_seconds`.

use chrono::{DateTime, TimeZone, Utc};
use mule_ring_detector::{MuleDetectionEngine, Transaction};

fn ts(hours: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + hours * 3600, 0).unwrap()
}

fn tx(id: &str, from: &str, to: &str, amount: f64, hours: i64) -> Transaction {
    Transaction::new(id, from, to, amount, ts(hours))
}

fn sample_batch() -> Vec<Transaction> {
    let mut txs = vec![
        tx("C1", "A", "B", 500.0, 0),
        tx("C2", "B", "C", 500.0, 1),
        tx("C3", "C", "A", 500.0, 2),
        tx("L1", "A", "X", 1000.0, 10),
        tx("L2", "X", "Y", 1000.0, 11),
        tx("L3", "Y", "Z", 1000.0, 12),
        tx("L4", "Z", "D", 1000.0, 13),
    ];
    for i in 0..11 {
        txs.push(tx(&format!("F{i}"), &format!("SENDER{i}"), "HUB", 50.0, 20 + i));
    }
    txs
}

fn without_timing(mut report: mule_ring_detector::DetectionReport) -> mule_ring_detector::DetectionReport {
    report.summary.processing_time_seconds = 0.0;
    report
}

#[test]
fn repeated_runs_are_byte_identical_modulo_timing() {
    let engine = MuleDetectionEngine::new();
    let first = without_timing(engine.run(sample_batch()).unwrap());
    let second = without_timing(engine.run(sample_batch()).unwrap());
    assert_eq!(first, second);
}

#[test]
fn permuting_input_order_preserves_the_result() {
    let engine = MuleDetectionEngine::new();
    let original = without_timing(engine.run(sample_batch()).unwrap());

    // Reverse the whole batch: timestamps are unchanged per-transaction, so
    // this is exactly the "permute input order, preserve timestamps" case.
    let mut reversed = sample_batch();
    reversed.reverse();
    let permuted = without_timing(engine.run(reversed).unwrap());

    assert_eq!(original, permuted);
}

#[test]
fn appending_fresh_accounts_cannot_lower_existing_scores() {
    let engine = MuleDetectionEngine::new();
    let before = engine.run(sample_batch()).unwrap();

    let mut extended = sample_batch();
    for i in 0..5 {
        extended.push(tx(
            &format!("FRESH{i}"),
            &format!("NEWCOMER{i}"),
            "NOWHERE",
            10.0,
            100 + i,
        ));
    }
    let after = engine.run(extended).unwrap();

    for account in &before.suspicious_accounts {
        let still_present = after
            .suspicious_accounts
            .iter()
            .find(|a| a.account_id == account.account_id)
            .expect("account scored before must still be scored above threshold");
        assert!(still_present.suspicion_score >= account.suspicion_score);
    }
}
