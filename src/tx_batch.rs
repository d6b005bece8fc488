//! Immutable, timestamp-sorted transaction table with precomputed indices.
//!
//! `TxBatch` is built once from a sequence of [`Transaction`]s and never
//! mutated afterward. Every downstream detector borrows it; none of them
//! need to re-walk the raw transaction list.

use crate::transaction::Transaction;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Adjacency stored as a contiguous array with per-vertex offset ranges,
/// rather than a `HashMap`-of-`Vec` graph: this keeps successor/predecessor
/// lookups cache-friendly for the hot loops in `CycleFinder` and
/// `ShellChainFinder`.
#[derive(Debug, Clone)]
struct Csr {
    offsets: Vec<usize>,
    targets: Vec<usize>,
}

impl Csr {
    fn build(adjacency: Vec<Vec<usize>>) -> Self {
        let mut offsets = Vec::with_capacity(adjacency.len() + 1);
        let mut targets = Vec::new();
        offsets.push(0);
        for row in adjacency {
            targets.extend(row);
            offsets.push(targets.len());
        }
        Self { offsets, targets }
    }

    fn row(&self, v: usize) -> &[usize] {
        &self.targets[self.offsets[v]..self.offsets[v + 1]]
    }
}

/// Per-account attributes derived from the batch.
#[derive(Debug, Clone, Default)]
struct AccountRecord {
    in_count: usize,
    out_count: usize,
    unique_senders: HashSet<usize>,
    unique_receivers: HashSet<usize>,
    in_timestamps: Vec<DateTime<Utc>>,
    out_timestamps: Vec<DateTime<Utc>>,
    in_amounts: Vec<f64>,
    out_amounts: Vec<f64>,
    in_tx: Vec<usize>,
    out_tx: Vec<usize>,
}

/// Immutable, timestamp-sorted transaction table plus precomputed
/// per-account indices.
pub struct TxBatch {
    transactions: Vec<Transaction>,
    accounts: Vec<String>,
    account_index: HashMap<String, usize>,
    records: Vec<AccountRecord>,
    out_adjacency: Csr,
    in_adjacency: Csr,
}

impl TxBatch {
    /// Build a batch from a transaction sequence.
    ///
    /// Transactions are stable-sorted by timestamp ascending; equal
    /// timestamps keep their relative input order, matching the "secondary
    /// key is input order" rule. Accounts are assigned indices in
    /// first-appearance order over that sorted sequence, which is what
    /// every downstream deterministic iteration order is derived from.
    pub fn from_transactions(mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        let mut accounts = Vec::new();
        let mut account_index: HashMap<String, usize> = HashMap::new();
        let mut records: Vec<AccountRecord> = Vec::new();
        let mut out_adj: Vec<Vec<usize>> = Vec::new();
        let mut in_adj: Vec<Vec<usize>> = Vec::new();
        let mut out_seen: Vec<HashSet<usize>> = Vec::new();
        let mut in_seen: Vec<HashSet<usize>> = Vec::new();

        let mut index_of = |id: &str,
                             accounts: &mut Vec<String>,
                             account_index: &mut HashMap<String, usize>,
                             records: &mut Vec<AccountRecord>,
                             out_adj: &mut Vec<Vec<usize>>,
                             in_adj: &mut Vec<Vec<usize>>,
                             out_seen: &mut Vec<HashSet<usize>>,
                             in_seen: &mut Vec<HashSet<usize>>|
         -> usize {
            if let Some(&idx) = account_index.get(id) {
                return idx;
            }
            let idx = accounts.len();
            accounts.push(id.to_string());
            account_index.insert(id.to_string(), idx);
            records.push(AccountRecord::default());
            out_adj.push(Vec::new());
            in_adj.push(Vec::new());
            out_seen.push(HashSet::new());
            in_seen.push(HashSet::new());
            idx
        };

        for (tx_idx, tx) in transactions.iter().enumerate() {
            let sender = index_of(
                &tx.sender_id,
                &mut accounts,
                &mut account_index,
                &mut records,
                &mut out_adj,
                &mut in_adj,
                &mut out_seen,
                &mut in_seen,
            );
            let receiver = index_of(
                &tx.receiver_id,
                &mut accounts,
                &mut account_index,
                &mut records,
                &mut out_adj,
                &mut in_adj,
                &mut out_seen,
                &mut in_seen,
            );

            records[sender].out_count += 1;
            records[sender].unique_receivers.insert(receiver);
            records[sender].out_timestamps.push(tx.timestamp);
            records[sender].out_amounts.push(tx.amount);
            records[sender].out_tx.push(tx_idx);

            records[receiver].in_count += 1;
            records[receiver].unique_senders.insert(sender);
            records[receiver].in_timestamps.push(tx.timestamp);
            records[receiver].in_amounts.push(tx.amount);
            records[receiver].in_tx.push(tx_idx);

            if out_seen[sender].insert(receiver) {
                out_adj[sender].push(receiver);
            }
            if in_seen[receiver].insert(sender) {
                in_adj[receiver].push(sender);
            }
        }

        let out_adjacency = Csr::build(out_adj);
        let in_adjacency = Csr::build(in_adj);

        Self {
            transactions,
            accounts,
            account_index,
            records,
            out_adjacency,
            in_adjacency,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn transaction(&self, tx_index: usize) -> &Transaction {
        &self.transactions[tx_index]
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Accounts in first-appearance order (stable, input-order-derived).
    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    pub fn account_index(&self, account_id: &str) -> Option<usize> {
        self.account_index.get(account_id).copied()
    }

    pub fn account_id(&self, index: usize) -> &str {
        &self.accounts[index]
    }

    pub fn in_count(&self, index: usize) -> usize {
        self.records[index].in_count
    }

    pub fn out_count(&self, index: usize) -> usize {
        self.records[index].out_count
    }

    pub fn total_activity(&self, index: usize) -> usize {
        self.in_count(index) + self.out_count(index)
    }

    pub fn unique_senders(&self, index: usize) -> &HashSet<usize> {
        &self.records[index].unique_senders
    }

    pub fn unique_receivers(&self, index: usize) -> &HashSet<usize> {
        &self.records[index].unique_receivers
    }

    /// Ascending by timestamp (construction order guarantees this).
    pub fn in_timestamps(&self, index: usize) -> &[DateTime<Utc>] {
        &self.records[index].in_timestamps
    }

    /// Ascending by timestamp (construction order guarantees this).
    pub fn out_timestamps(&self, index: usize) -> &[DateTime<Utc>] {
        &self.records[index].out_timestamps
    }

    pub fn out_amounts(&self, index: usize) -> &[f64] {
        &self.records[index].out_amounts
    }

    pub fn in_amounts(&self, index: usize) -> &[f64] {
        &self.records[index].in_amounts
    }

    pub fn in_tx(&self, index: usize) -> &[usize] {
        &self.records[index].in_tx
    }

    pub fn out_tx(&self, index: usize) -> &[usize] {
        &self.records[index].out_tx
    }

    /// Successor accounts, deduplicated, in first-appearance order.
    pub fn edges(&self, index: usize) -> &[usize] {
        self.out_adjacency.row(index)
    }

    /// Predecessor accounts, deduplicated, in first-appearance order.
    pub fn rev_edges(&self, index: usize) -> &[usize] {
        self.in_adjacency.row(index)
    }

    pub fn earliest_in(&self, index: usize) -> Option<DateTime<Utc>> {
        self.records[index].in_timestamps.first().copied()
    }

    pub fn earliest_out(&self, index: usize) -> Option<DateTime<Utc>> {
        self.records[index].out_timestamps.first().copied()
    }
}
