//! Layered shell-network chain discovery.
//!
//! Finds directed paths that pass through low-activity "shell" accounts —
//! the layering step of a mule ring, where funds hop through disposable
//! intermediaries before reaching a cash-out point.

use crate::config::DetectionConfig;
use crate::error::{DetectionError, DetectionResult};
use crate::tx_batch::TxBatch;
use std::collections::{HashSet, VecDeque};
use std::time::Instant;

/// A recorded layering path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellChain {
    pub path: Vec<usize>,
    pub hop_count: usize,
    pub shell_interior_count: usize,
}

pub struct ShellChainFinder<'a> {
    batch: &'a TxBatch,
    config: &'a DetectionConfig,
}

impl<'a> ShellChainFinder<'a> {
    pub fn new(batch: &'a TxBatch, config: &'a DetectionConfig) -> Self {
        Self { batch, config }
    }

    fn is_shell_candidate(&self, account: usize) -> bool {
        let activity = self.batch.total_activity(account);
        (2..=self.config.max_shell_tx).contains(&activity)
    }

    /// Deterministic starting vertices: the first `max_chain_starts`
    /// accounts in first-appearance order, rather than a random sample.
    fn start_vertices(&self) -> Vec<usize> {
        let n = self.batch.account_count();
        (0..n.min(self.config.max_chain_starts)).collect()
    }

    pub fn find(&self, deadline: Option<Instant>) -> DetectionResult<Vec<ShellChain>> {
        let mut chains = Vec::new();

        for start in self.start_vertices() {
            if chains.len() >= self.config.max_chains {
                break;
            }
            self.search_from(start, &mut chains, deadline)?;
        }

        Ok(chains)
    }

    fn search_from(
        &self,
        start: usize,
        chains: &mut Vec<ShellChain>,
        deadline: Option<Instant>,
    ) -> DetectionResult<()> {
        let mut visited: HashSet<usize> = HashSet::new();
        visited.insert(start);
        let mut queue: VecDeque<Vec<usize>> = VecDeque::new();
        queue.push_back(vec![start]);

        while let Some(path) = queue.pop_front() {
            if let Some(dl) = deadline {
                if Instant::now() >= dl {
                    return Err(DetectionError::Timeout);
                }
            }
            if chains.len() >= self.config.max_chains {
                return Ok(());
            }

            if path.len() >= 4 {
                let shell_interior_count = path[1..path.len() - 1]
                    .iter()
                    .filter(|&&v| self.is_shell_candidate(v))
                    .count();
                if shell_interior_count > 0 {
                    chains.push(ShellChain {
                        hop_count: path.len() - 1,
                        shell_interior_count,
                        path,
                    });
                    if chains.len() >= self.config.max_chains {
                        return Ok(());
                    }
                    continue;
                }
            }

            if path.len() < 5 {
                let current = *path.last().unwrap();
                for &next in self.batch.edges(current).iter().take(self.config.shell_branch_cap) {
                    if !visited.contains(&next) {
                        visited.insert(next);
                        let mut extended = path.clone();
                        extended.push(next);
                        queue.push_back(extended);
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    fn tx(id: &str, from: &str, to: &str, seconds: i64) -> Transaction {
        Transaction::new(id, from, to, 100.0, ts(seconds))
    }

    #[test]
    fn finds_chain_through_shell_interior() {
        // A -> S1 -> S2 -> D: S1, S2 each have exactly 2 transactions.
        let batch = TxBatch::from_transactions(vec![
            tx("T1", "A", "S1", 0),
            tx("T2", "S1", "S2", 1),
            tx("T3", "S2", "D", 2),
        ]);
        let config = DetectionConfig::default();
        let finder = ShellChainFinder::new(&batch, &config);
        let chains = finder.find(None).unwrap();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].hop_count, 3);
        assert_eq!(chains[0].shell_interior_count, 2);
    }

    #[test]
    fn rejects_chain_without_shell_interior() {
        // Interior accounts are high-activity, not shell candidates.
        let mut txs = vec![
            tx("T1", "A", "B", 0),
            tx("T2", "B", "C", 1),
            tx("T3", "C", "D", 2),
        ];
        for i in 0..5 {
            txs.push(tx(&format!("E{i}"), "B", "FILLER", 100 + i));
        }
        let batch = TxBatch::from_transactions(txs);
        let config = DetectionConfig::default();
        let finder = ShellChainFinder::new(&batch, &config);
        let chains = finder.find(None).unwrap();
        assert!(chains.iter().all(|c| c.path != vec![
            batch.account_index("A").unwrap(),
            batch.account_index("B").unwrap(),
            batch.account_index("C").unwrap(),
            batch.account_index("D").unwrap(),
        ]));
    }

    #[test]
    fn short_paths_are_not_recorded() {
        let batch = TxBatch::from_transactions(vec![tx("T1", "A", "B", 0), tx("T2", "B", "C", 1)]);
        let config = DetectionConfig::default();
        let finder = ShellChainFinder::new(&batch, &config);
        let chains = finder.find(None).unwrap();
        assert!(chains.is_empty());
    }
}
