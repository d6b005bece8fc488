//! Mule ring detection walkthrough.
//!
//! Builds a handful of representative transaction batches and runs each one
//! through the detection engine, printing the resulting envelope the way a
//! caller at the HTTP boundary would see it.

use chrono::{DateTime, TimeZone, Utc};
use mule_ring_detector::{MuleDetectionEngine, Transaction};

fn ts(hours: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + hours * 3600, 0).unwrap()
}

fn tx(id: &str, from: &str, to: &str, amount: f64, hours: i64) -> Transaction {
    Transaction::new(id, from, to, amount, ts(hours))
}

fn main() {
    println!("=== Mule Ring Detection Engine ===\n");

    let engine = MuleDetectionEngine::new();

    // Example 1: Pure triangle — circular fund routing.
    println!("1. Circular Fund Routing (A -> B -> C -> A)");
    let triangle = vec![
        tx("T1", "A", "B", 500.0, 0),
        tx("T2", "B", "C", 500.0, 1),
        tx("T3", "C", "A", 500.0, 2),
    ];
    let report = engine.run(triangle).unwrap();
    for account in &report.suspicious_accounts {
        println!(
            "   {} — score {:.2}, ring {:?}, patterns {:?}",
            account.account_id, account.suspicion_score, account.ring_id, account.detected_patterns
        );
    }
    for ring in &report.fraud_rings {
        println!(
            "   ring {} ({}) members {:?}, risk {:.2}",
            ring.ring_id, ring.pattern_type, ring.member_accounts, ring.risk_score
        );
    }
    println!();

    // Example 2: Fast fan-in redistribution — classic smurfing mule.
    println!("2. Fan-In Smurfing With Fast Redistribution");
    let mut smurfing = Vec::new();
    for i in 0..12 {
        smurfing.push(tx(&format!("S{i}"), &format!("SENDER{i}"), "MULE", 100.0, i));
    }
    smurfing.push(tx("OUT", "MULE", "CASHOUT", 1200.0, 3));
    let report = engine.run(smurfing).unwrap();
    for account in &report.suspicious_accounts {
        println!(
            "   {} — score {:.2}, patterns {:?}",
            account.account_id, account.suspicion_score, account.detected_patterns
        );
    }
    println!();

    // Example 3: Merchant fan-in — should NOT be flagged.
    println!("3. Legitimate Merchant Fan-In (false-positive suppression)");
    let mut merchant = Vec::new();
    for i in 0..40 {
        merchant.push(tx(&format!("M{i}"), &format!("CUSTOMER{i}"), "STORE", 50.0, i * 6));
    }
    merchant.push(tx("TAX", "STORE", "TAXACCT", 500.0, 241 * 6));
    let report = engine.run(merchant).unwrap();
    println!(
        "   flagged accounts: {} (expected 0 — merchant class caps the score)",
        report.suspicious_accounts.len()
    );
    println!();

    // Example 4: Layered shell network.
    println!("4. Layered Shell Network (A -> B -> C -> D -> E)");
    let shell_chain = vec![
        tx("L1", "A", "B", 1000.0, 0),
        tx("L2", "B", "C", 1000.0, 1),
        tx("L3", "C", "D", 1000.0, 2),
        tx("L4", "D", "E", 1000.0, 3),
    ];
    let report = engine.run(shell_chain).unwrap();
    for account in &report.suspicious_accounts {
        println!(
            "   {} — score {:.2}, patterns {:?}",
            account.account_id, account.suspicion_score, account.detected_patterns
        );
    }
    for ring in &report.fraud_rings {
        println!(
            "   ring {} ({}) members {:?}",
            ring.ring_id, ring.pattern_type, ring.member_accounts
        );
    }
    println!();

    println!("=== Summary (example 4) ===");
    println!(
        "   accounts analyzed: {}, flagged: {}, rings: {}, took {:.3}s",
        report.summary.total_accounts_analyzed,
        report.summary.suspicious_accounts_flagged,
        report.summary.fraud_rings_detected,
        report.summary.processing_time_seconds
    );

    println!("\n{}", report.to_json().unwrap());
}
