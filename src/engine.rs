//! Pipeline orchestration: `TxBatch` → detectors → `Scorer` → `RingBuilder`
//! → output envelope.
//!
//! `MuleDetectionEngine` is a single entry point that threads every
//! sub-step into one result. It holds nothing but its config: no state
//! survives past the call that produced it, so two engines constructed
//! with the same config behave identically on the same input.

use crate::classifier::{AccountClass, AccountClassifier};
use crate::config::DetectionConfig;
use crate::cycle_finder::CycleFinder;
use crate::envelope::{AnalysisSummary, DetectionReport, FraudRingRecord, SuspiciousAccountRecord};
use crate::error::{DetectionError, DetectionResult};
use crate::ring_builder::{RingBuilder, RingMembership};
use crate::scorer::{ScoredAccount, Scorer};
use crate::shell_chain::ShellChainFinder;
use crate::smurfing::SmurfingDetector;
use crate::transaction::Transaction;
use crate::tx_batch::TxBatch;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Runs one isolated detection pass over a bounded, immutable batch of
/// transactions.
pub struct MuleDetectionEngine {
    config: DetectionConfig,
}

impl MuleDetectionEngine {
    pub fn new() -> Self {
        Self {
            config: DetectionConfig::default(),
        }
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Run without a deadline.
    pub fn run(&self, transactions: Vec<Transaction>) -> DetectionResult<DetectionReport> {
        self.run_with_deadline(transactions, None)
    }

    /// Run with an optional wall-clock budget. The four detector passes
    /// check the deadline at each loop head; on expiry the pipeline returns
    /// [`DetectionError::Timeout`] and no partial report.
    pub fn run_with_deadline(
        &self,
        transactions: Vec<Transaction>,
        deadline: Option<Duration>,
    ) -> DetectionResult<DetectionReport> {
        let start = Instant::now();
        let deadline_instant = deadline.map(|d| start + d);

        if transactions.is_empty() {
            return Err(DetectionError::EmptyBatch);
        }

        let batch = TxBatch::from_transactions(transactions);

        let cycles = CycleFinder::new(&batch, &self.config).find(deadline_instant)?;
        let (fan_hits, _merchant_trap_hints) =
            SmurfingDetector::new(&batch, &self.config).find(deadline_instant)?;
        let shell_chains = ShellChainFinder::new(&batch, &self.config).find(deadline_instant)?;

        let classes: Vec<AccountClass> =
            AccountClassifier::new(&batch, self.config.max_shell_tx).classify_all();

        let scored = Scorer::new(
            &batch,
            &classes,
            self.config.merchant_cap,
            self.config.payroll_cap,
        )
        .score_accounts(&cycles, &fan_hits, &shell_chains);

        let reported: HashMap<usize, ScoredAccount> = scored
            .into_iter()
            .filter(|s| self.clears_reporting_gate(s.score, classes[s.account]))
            .map(|s| (s.account, s))
            .collect();

        let (rings, membership, _counter) =
            RingBuilder::new().build(&cycles, &shell_chains, &reported);

        let mut suspicious_accounts: Vec<SuspiciousAccountRecord> = reported
            .values()
            .map(|scored_account| {
                let ring_id = match membership.get(scored_account.account) {
                    Some(RingMembership::Ring(idx)) => Some(rings[*idx].ring_id.clone()),
                    _ => None,
                };
                SuspiciousAccountRecord {
                    account_id: batch.account_id(scored_account.account).to_string(),
                    suspicion_score: scored_account.score,
                    detected_patterns: scored_account.patterns.clone(),
                    ring_id,
                }
            })
            .collect();

        // Strictly non-increasing by score; ties break by account id
        // ascending (unique, so this fully determines order).
        suspicious_accounts.sort_by(|a, b| {
            b.suspicion_score
                .partial_cmp(&a.suspicion_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.account_id.cmp(&b.account_id))
        });

        let fraud_rings: Vec<FraudRingRecord> = rings
            .iter()
            .map(|ring| FraudRingRecord {
                ring_id: ring.ring_id.clone(),
                member_accounts: ring
                    .members
                    .iter()
                    .map(|&m| batch.account_id(m).to_string())
                    .collect(),
                pattern_type: ring.pattern.as_str().to_string(),
                risk_score: ring.risk_score,
            })
            .collect();

        let summary = AnalysisSummary {
            total_accounts_analyzed: batch.account_count(),
            suspicious_accounts_flagged: suspicious_accounts.len(),
            fraud_rings_detected: fraud_rings.len(),
            processing_time_seconds: (start.elapsed().as_secs_f64() * 1000.0).round() / 1000.0,
        };

        Ok(DetectionReport {
            suspicious_accounts,
            fraud_rings,
            summary,
        })
    }

    /// Merchant/payroll accounts report only above the legitimate-business
    /// threshold; the class cap (§4.6) makes this gate essentially
    /// unreachable today, but it stays independent of the cap so a future
    /// weight change can't silently start flagging every merchant.
    fn clears_reporting_gate(&self, score: f64, class: AccountClass) -> bool {
        match class {
            AccountClass::Merchant | AccountClass::Payroll => {
                score > self.config.legitimate_business_threshold
            }
            AccountClass::Shell | AccountClass::Standard => score > self.config.report_threshold,
        }
    }
}

impl Default for MuleDetectionEngine {
    fn default() -> Self {
        Self::new()
    }
}
