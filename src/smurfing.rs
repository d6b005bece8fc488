//! Fan-in / fan-out "smurfing" detection over a sliding temporal window.

use crate::config::DetectionConfig;
use crate::error::DetectionResult;
use crate::tx_batch::TxBatch;
use chrono::{DateTime, Duration, Utc};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanDirection {
    In,
    Out,
}

/// A fan-in or fan-out hit for one account.
#[derive(Debug, Clone, PartialEq)]
pub struct FanHit {
    pub account: usize,
    pub direction: FanDirection,
    pub counterparty_count: usize,
    pub window_hours: f64,
    pub transaction_count: usize,
    pub mean_amount: f64,
}

/// An account whose counterparty count cleared the fan threshold but whose
/// window exceeded `window_hours` — a hint for the classifier, not a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MerchantTrapCandidate {
    pub account: usize,
    pub direction: FanDirection,
}

pub struct SmurfingDetector<'a> {
    batch: &'a TxBatch,
    config: &'a DetectionConfig,
}

impl<'a> SmurfingDetector<'a> {
    pub fn new(batch: &'a TxBatch, config: &'a DetectionConfig) -> Self {
        Self { batch, config }
    }

    /// Returns `(fan hits, merchant-trap hints)`, both ordered by ascending
    /// account index.
    pub fn find(
        &self,
        deadline: Option<Instant>,
    ) -> DetectionResult<(Vec<FanHit>, Vec<MerchantTrapCandidate>)> {
        let mut hits = Vec::new();
        let mut trap_candidates = Vec::new();
        let window = Duration::hours(self.config.window_hours);

        for account in 0..self.batch.account_count() {
            if let Some(dl) = deadline {
                if Instant::now() >= dl {
                    return Err(crate::error::DetectionError::Timeout);
                }
            }

            self.evaluate_side(
                account,
                FanDirection::In,
                self.batch.unique_senders(account).len(),
                self.batch.in_timestamps(account),
                self.batch.in_amounts(account),
                window,
                &mut hits,
                &mut trap_candidates,
            );
            self.evaluate_side(
                account,
                FanDirection::Out,
                self.batch.unique_receivers(account).len(),
                self.batch.out_timestamps(account),
                self.batch.out_amounts(account),
                window,
                &mut hits,
                &mut trap_candidates,
            );
        }

        Ok((hits, trap_candidates))
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate_side(
        &self,
        account: usize,
        direction: FanDirection,
        counterparty_count: usize,
        timestamps: &[DateTime<Utc>],
        amounts: &[f64],
        window: Duration,
        hits: &mut Vec<FanHit>,
        trap_candidates: &mut Vec<MerchantTrapCandidate>,
    ) {
        if counterparty_count < self.config.fan_threshold || timestamps.is_empty() {
            return;
        }

        let min_ts = *timestamps.first().unwrap();
        let max_ts = *timestamps.last().unwrap();
        let span = max_ts - min_ts;

        if span <= window {
            let mean_amount = if amounts.is_empty() {
                0.0
            } else {
                amounts.iter().sum::<f64>() / amounts.len() as f64
            };

            hits.push(FanHit {
                account,
                direction,
                counterparty_count,
                window_hours: span.num_seconds() as f64 / 3600.0,
                transaction_count: timestamps.len(),
                mean_amount,
            });
        } else {
            trap_candidates.push(MerchantTrapCandidate { account, direction });
        }
    }
}
