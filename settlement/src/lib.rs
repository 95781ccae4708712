//! Trip Settlement Engine
//!
//! Computes who owes whom on a shared trip and the fewest payments that
//! settle it.
//!
//! # Architecture
//!
//! The pipeline is a pure function of a trip and its expenses:
//!
//! 1. **Balances**: fold expenses into a net balance per member
//! 2. **Netting**: match largest creditors with largest debtors
//! 3. **Tracking**: split transfers into active and user-cleared
//!
//! Recomputation is explicit. Subscribe to
//! [`trip_ledger::TripLedger::subscribe`] and call the engine again when
//! a change arrives.
//!
//! # Invariants
//!
//! - Zero-sum: Σ balances == 0 for any trip with at least one member
//! - Conservation: received - paid == balance for every member
//! - Determinism: same expenses → same transfers in the same order

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod balance;
pub mod netting;
pub mod tracker;
pub mod summary;
pub mod analytics;
pub mod error;
pub mod config;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use balance::BalanceCalculator;
pub use netting::TransferSimplifier;
pub use tracker::SettlementTracker;
pub use summary::DebtSummary;
pub use analytics::{overall_total, TripSpending};
pub use config::{Config, NettingConfig, TrackerConfig};
pub use engine::SettlementEngine;
