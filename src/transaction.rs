//! The immutable transaction record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single transfer between two accounts.
///
/// Transactions are treated as opaque, immutable facts once ingested: the
/// batch may contain duplicate (sender, receiver) pairs at different times,
/// and they are preserved rather than merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        transaction_id: impl Into<String>,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        amount: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            amount,
            timestamp,
        }
    }
}
