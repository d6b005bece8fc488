//! Evidence fusion: combines pattern hits and temporal behavior into a
//! single bounded suspicion score per account.

use crate::classifier::AccountClass;
use crate::cycle_finder::Cycle;
use crate::shell_chain::ShellChain;
use crate::smurfing::{FanDirection, FanHit};
use crate::tx_batch::TxBatch;
use std::collections::BTreeMap;

const CYCLE_BASE: f64 = 85.0;
const FAST_SMURF_BASE: f64 = 75.0;
const FAST_SMURF_MULTIPLIER: f64 = 1.3;
const DELAYED_SMURF_BASE: f64 = 55.0;
const DELAYED_SMURF_MULTIPLIER: f64 = 1.1;
const SLOW_SMURF_BASE: f64 = 40.0;
const SHELL_CHAIN_BASE: f64 = 60.0;

/// A scored account, carrying the pattern tags that contributed to its
/// score in first-emission order, de-duplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAccount {
    pub account: usize,
    pub score: f64,
    pub patterns: Vec<String>,
}

struct Contribution {
    base: f64,
    multiplier: f64,
    tags: Vec<String>,
}

pub struct Scorer<'a> {
    batch: &'a TxBatch,
    classes: &'a [AccountClass],
    merchant_cap: f64,
    payroll_cap: f64,
}

impl<'a> Scorer<'a> {
    pub fn new(batch: &'a TxBatch, classes: &'a [AccountClass], merchant_cap: f64, payroll_cap: f64) -> Self {
        Self {
            batch,
            classes,
            merchant_cap,
            payroll_cap,
        }
    }

    /// Redistribution-speed probe: how quickly money leaves after arriving.
    fn redistribution_multiplier(&self, account: usize) -> f64 {
        let t_in = self.batch.earliest_in(account);
        let t_out = self.batch.earliest_out(account);
        match (t_in, t_out) {
            (Some(t_in), Some(t_out)) if t_out > t_in => {
                let delta_hours = (t_out - t_in).num_seconds() as f64 / 3600.0;
                if delta_hours <= 24.0 {
                    1.3
                } else if delta_hours <= 96.0 {
                    1.1
                } else {
                    1.0
                }
            }
            _ => 1.0,
        }
    }

    /// Score every account in the batch, producing one entry per account
    /// regardless of whether it clears the reporting threshold — gating
    /// happens in the engine, not here.
    pub fn score_accounts(
        &self,
        cycles: &[Cycle],
        fan_hits: &[FanHit],
        shell_chains: &[ShellChain],
    ) -> Vec<ScoredAccount> {
        let n = self.batch.account_count();
        let mut cycle_tags: Vec<Vec<String>> = vec![Vec::new(); n];
        for cycle in cycles {
            let tag = format!("cycle_length_{}", cycle.len());
            for &member in &cycle.members {
                if !cycle_tags[member].contains(&tag) {
                    cycle_tags[member].push(tag.clone());
                }
            }
        }

        let mut fan_by_account: BTreeMap<usize, &FanHit> = BTreeMap::new();
        for hit in fan_hits {
            // At most one fan-in and one fan-out hit per account is
            // possible from the detector; keep the first seen per account
            // regardless of direction since the base/tag only depends on
            // the redistribution probe, not the direction itself.
            fan_by_account.entry(hit.account).or_insert(hit);
        }

        // Every path member (endpoints included) picks up the chain's tag;
        // only interior members pick up the base-score contribution. See
        // Open Question (b): the tag marks membership, the score marks
        // pass-through risk.
        let mut shell_membership: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut shell_is_interior: Vec<bool> = vec![false; n];
        for (idx, chain) in shell_chains.iter().enumerate() {
            let last = chain.path.len() - 1;
            for (pos, &member) in chain.path.iter().enumerate() {
                if !shell_membership[member].contains(&idx) {
                    shell_membership[member].push(idx);
                }
                if pos > 0 && pos < last {
                    shell_is_interior[member] = true;
                }
            }
        }

        (0..n)
            .map(|account| {
                let mut contributions = Vec::new();

                if !cycle_tags[account].is_empty() {
                    contributions.push(Contribution {
                        base: CYCLE_BASE,
                        multiplier: 1.0,
                        tags: cycle_tags[account].clone(),
                    });
                }

                if fan_by_account.contains_key(&account) {
                    let mult = self.redistribution_multiplier(account);
                    let (base, tag) = if mult >= 1.3 {
                        (FAST_SMURF_BASE, "fast_redistribution_smurfing")
                    } else if mult > 1.0 {
                        (DELAYED_SMURF_BASE, "delayed_redistribution_smurfing")
                    } else {
                        (SLOW_SMURF_BASE, "high_volume_account")
                    };
                    let applied_multiplier = if mult >= 1.3 {
                        FAST_SMURF_MULTIPLIER
                    } else if mult > 1.0 {
                        DELAYED_SMURF_MULTIPLIER
                    } else {
                        1.0
                    };
                    contributions.push(Contribution {
                        base,
                        multiplier: applied_multiplier,
                        tags: vec![tag.to_string()],
                    });
                }

                // Shell-chain tag attaches to every path member of a chain
                // containing this account, including the chain's own
                // endpoints; the base-score contribution applies only if
                // the account is interior to at least one chain — an
                // endpoint-only membership contributes a tag with no score.
                if !shell_membership[account].is_empty() {
                    let mut tags = Vec::new();
                    for &idx in &shell_membership[account] {
                        let tag = format!("shell_chain_{}_hops", shell_chains[idx].hop_count);
                        if !tags.contains(&tag) {
                            tags.push(tag);
                        }
                    }
                    let base = if shell_is_interior[account] {
                        SHELL_CHAIN_BASE
                    } else {
                        0.0
                    };
                    contributions.push(Contribution {
                        base,
                        multiplier: 1.0,
                        tags,
                    });
                }

                self.fuse(account, contributions)
            })
            .collect()
    }

    fn fuse(&self, account: usize, contributions: Vec<Contribution>) -> ScoredAccount {
        if contributions.is_empty() {
            return ScoredAccount {
                account,
                score: 0.0,
                patterns: Vec::new(),
            };
        }

        let bases: Vec<f64> = contributions.iter().map(|c| c.base).collect();
        let primary_idx = bases
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        let primary = bases[primary_idx];
        let supporting: f64 = bases.iter().sum::<f64>() - primary;
        let multiplier: f64 = contributions.iter().map(|c| c.multiplier).product();

        let raw = (primary + 0.2 * supporting) * multiplier;

        let class = self.classes[account];
        let capped = match class {
            AccountClass::Merchant => raw.min(self.merchant_cap),
            AccountClass::Payroll => raw.min(self.payroll_cap),
            AccountClass::Shell | AccountClass::Standard => raw,
        };

        let clamped = capped.clamp(0.0, 100.0);
        let score = (clamped * 100.0).round() / 100.0;

        let mut patterns = Vec::new();
        for contribution in &contributions {
            for tag in &contribution.tags {
                if !patterns.contains(tag) {
                    patterns.push(tag.clone());
                }
            }
        }

        ScoredAccount {
            account,
            score,
            patterns,
        }
    }
}
