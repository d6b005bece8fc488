//! The output envelope handed to the serialization collaborator.
//!
//! Field names and nesting mirror the boundary contract (§6 of the
//! specification this crate implements) exactly, so the collaborator can
//! serialize a [`DetectionReport`] without any renaming or reshaping.

use serde::{Deserialize, Serialize};

/// One flagged account: identity, score, evidence, and ring membership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuspiciousAccountRecord {
    pub account_id: String,
    pub suspicion_score: f64,
    pub detected_patterns: Vec<String>,
    pub ring_id: Option<String>,
}

/// One assembled ring: members, the structural pattern that formed it, and
/// its aggregate risk score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FraudRingRecord {
    pub ring_id: String,
    pub member_accounts: Vec<String>,
    pub pattern_type: String,
    pub risk_score: f64,
}

/// Run-level counts and timing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSummary {
    pub total_accounts_analyzed: usize,
    pub suspicious_accounts_flagged: usize,
    pub fraud_rings_detected: usize,
    pub processing_time_seconds: f64,
}

/// The complete result of one detection run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionReport {
    pub suspicious_accounts: Vec<SuspiciousAccountRecord>,
    pub fraud_rings: Vec<FraudRingRecord>,
    pub summary: AnalysisSummary,
}

impl DetectionReport {
    /// Export as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let report = DetectionReport {
            suspicious_accounts: vec![SuspiciousAccountRecord {
                account_id: "A".to_string(),
                suspicion_score: 97.5,
                detected_patterns: vec!["fast_redistribution_smurfing".to_string()],
                ring_id: None,
            }],
            fraud_rings: vec![FraudRingRecord {
                ring_id: "RING_001".to_string(),
                member_accounts: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                pattern_type: "circular_fund_routing".to_string(),
                risk_score: 85.0,
            }],
            summary: AnalysisSummary {
                total_accounts_analyzed: 3,
                suspicious_accounts_flagged: 1,
                fraud_rings_detected: 1,
                processing_time_seconds: 0.002,
            },
        };

        let json = report.to_json().unwrap();
        let parsed: DetectionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
