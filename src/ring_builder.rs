//! Ring assembly: groups scored accounts into fraud rings from cycles and
//! shell chains, each account belonging to at most one ring.

use crate::cycle_finder::Cycle;
use crate::scorer::ScoredAccount;
use crate::shell_chain::ShellChain;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPattern {
    CircularFundRouting,
    LayeredShellNetwork,
}

impl RingPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RingPattern::CircularFundRouting => "circular_fund_routing",
            RingPattern::LayeredShellNetwork => "layered_shell_network",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub ring_id: String,
    pub pattern: RingPattern,
    pub members: Vec<usize>,
    pub risk_score: f64,
}

/// An account's ring assignment, modeling "at most one ring" at the type
/// level rather than via a nullable id threaded through every consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingMembership {
    NoRing,
    Ring(usize),
}

pub struct RingBuilder;

impl RingBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Assemble rings in two passes: cycles first (each cycle always forms
    /// a ring, overwriting no prior assignment since this is the first
    /// pass), then shell chains (skipped if any member is already ringed).
    ///
    /// `reported` holds the subset of accounts that cleared the reporting
    /// threshold, keyed by account index. A ring's `risk_score` averages
    /// only over its members present in `reported` — matching the original
    /// system's `account_data` dict semantics, where members that never
    /// cleared the gate simply aren't in the averaging set at all, rather
    /// than contributing a zero.
    pub fn build(
        &self,
        cycles: &[Cycle],
        shell_chains: &[ShellChain],
        reported: &HashMap<usize, ScoredAccount>,
    ) -> (Vec<Ring>, Vec<RingMembership>, usize) {
        let account_count = reported
            .keys()
            .copied()
            .max()
            .map(|m| m + 1)
            .unwrap_or(0)
            .max(
                cycles
                    .iter()
                    .flat_map(|c| c.members.iter())
                    .chain(shell_chains.iter().flat_map(|c| c.path.iter()))
                    .copied()
                    .max()
                    .map(|m| m + 1)
                    .unwrap_or(0),
            );

        let mut membership = vec![RingMembership::NoRing; account_count];
        let mut rings = Vec::new();
        let mut counter = 0usize;

        for cycle in cycles {
            counter += 1;
            let ring_id = format!("RING_{:03}", counter);
            let risk_score = mean_reported_score(&cycle.members, reported);
            let ring_index = rings.len();
            for &member in &cycle.members {
                membership[member] = RingMembership::Ring(ring_index);
            }
            rings.push(Ring {
                ring_id,
                pattern: RingPattern::CircularFundRouting,
                members: cycle.members.clone(),
                risk_score,
            });
        }

        for chain in shell_chains {
            if chain.path.iter().any(|&m| membership[m] != RingMembership::NoRing) {
                continue;
            }
            counter += 1;
            let ring_id = format!("RING_{:03}", counter);
            let risk_score = mean_reported_score(&chain.path, reported);
            let ring_index = rings.len();
            for &member in &chain.path {
                membership[member] = RingMembership::Ring(ring_index);
            }
            rings.push(Ring {
                ring_id,
                pattern: RingPattern::LayeredShellNetwork,
                members: chain.path.clone(),
                risk_score,
            });
        }

        (rings, membership, counter)
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn mean_reported_score(members: &[usize], reported: &HashMap<usize, ScoredAccount>) -> f64 {
    let scores: Vec<f64> = members
        .iter()
        .filter_map(|m| reported.get(m).map(|a| a.score))
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let clamped = mean.clamp(0.0, 100.0);
    (clamped * 100.0).round() / 100.0
}
