//! Named configuration constants for the detection pipeline.

/// Tunable caps and thresholds for a detection run.
///
/// Every field mirrors a named constant from the pipeline's documented
/// thresholds, so a caller can shrink the global caps for a small test
/// fixture via [`crate::MuleDetectionEngine::with_config`] instead of
/// reconstructing the whole pipeline by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Minimum simple-cycle length considered (inclusive).
    pub min_cycle_len: usize,
    /// Maximum simple-cycle length considered (inclusive).
    pub max_cycle_len: usize,
    /// Unique-counterparty threshold for a fan-in/fan-out hit.
    pub fan_threshold: usize,
    /// Smurfing window, in hours.
    pub window_hours: i64,
    /// Upper bound (inclusive) on total activity for a shell candidate.
    pub max_shell_tx: usize,
    /// Divisor used to compute the hub-degree threshold: max(2, N / divisor).
    pub hub_degree_divisor: usize,
    /// Global cap on distinct cycles emitted.
    pub max_cycles: usize,
    /// Global cap on shell chains recorded.
    pub max_chains: usize,
    /// Cap on deterministic BFS start vertices for shell-chain discovery.
    pub max_chain_starts: usize,
    /// Successors explored per BFS node during shell-chain discovery.
    pub shell_branch_cap: usize,
    /// Minimum score (exclusive) for a standard/shell account to be reported.
    pub report_threshold: f64,
    /// Score ceiling for merchant-classified accounts.
    pub merchant_cap: f64,
    /// Score ceiling for payroll-classified accounts.
    pub payroll_cap: f64,
    /// Score a merchant/payroll account must exceed to be reported anyway.
    pub legitimate_business_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_cycle_len: 3,
            max_cycle_len: 5,
            fan_threshold: 10,
            window_hours: 72,
            max_shell_tx: 3,
            hub_degree_divisor: 200,
            max_cycles: 1000,
            max_chains: 500,
            max_chain_starts: 100,
            shell_branch_cap: 5,
            report_threshold: 20.0,
            merchant_cap: 35.0,
            payroll_cap: 30.0,
            legitimate_business_threshold: 75.0,
        }
    }
}
