//! # Mule Ring Detection Engine
//!
//! Ingests a bounded batch of financial transactions and identifies
//! accounts likely to be acting as money mules, together with the
//! coordinated groups ("rings") they form. Detection combines topological
//! analysis of the induced directed transaction graph — circular fund
//! routing, layered shell networks — with temporal behavioral analysis —
//! fan-in/fan-out smurfing, redistribution speed, legitimate-actor
//! classification.
//!
//! ## Pipeline
//!
//! ```text
//! TxBatch ─┬─> CycleFinder         ─┐
//!          ├─> SmurfingDetector     ├─> Scorer ─> RingBuilder ─> DetectionReport
//!          ├─> ShellChainFinder    ─┤
//!          └─> AccountClassifier   ─┘
//! ```
//!
//! Every pass is a pure function of an immutable [`TxBatch`]; the only
//! stateful object is the [`MuleDetectionEngine`] that threads them
//! together, and it holds nothing but its [`DetectionConfig`] between runs.
//!
//! ## Determinism
//!
//! Given identical input bytes the output is byte-identical: every
//! iteration order (accounts, edges, cycle starts, chain starts) is derived
//! from stable, input-order-dependent construction in [`TxBatch`], never
//! from hashing or sampling.
//!
//! ## Non-goals
//!
//! No streaming ingestion, no persistence across runs, no cross-batch
//! account memory, no machine-learned scoring. See `SPEC_FULL.md` for the
//! full requirements this crate implements.

pub mod classifier;
pub mod config;
pub mod cycle_finder;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod ring_builder;
pub mod scorer;
pub mod shell_chain;
pub mod smurfing;
pub mod transaction;
pub mod tx_batch;

pub use classifier::{AccountClass, AccountClassifier};
pub use config::DetectionConfig;
pub use cycle_finder::{Cycle, CycleFinder};
pub use engine::MuleDetectionEngine;
pub use envelope::{AnalysisSummary, DetectionReport, FraudRingRecord, SuspiciousAccountRecord};
pub use error::{DetectionError, DetectionResult};
pub use ring_builder::{Ring, RingBuilder, RingMembership, RingPattern};
pub use scorer::{ScoredAccount, Scorer};
pub use shell_chain::{ShellChain, ShellChainFinder};
pub use smurfing::{FanDirection, FanHit, MerchantTrapCandidate, SmurfingDetector};
pub use transaction::Transaction;
pub use tx_batch::TxBatch;
