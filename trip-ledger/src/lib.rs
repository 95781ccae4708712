//! Trip Ledger
//!
//! Shared-expense records for a group of people traveling together.
//!
//! # Architecture
//!
//! - **Storage boundary**: every document is JSON under a string key in a
//!   [`KeyValueStore`] (in-memory or one file per key)
//! - **Validation at the edge**: expenses are checked before they are
//!   recorded, so settlement can assume well-formed input
//! - **Explicit change notification**: mutations publish [`LedgerChange`]
//!   on a broadcast channel; callers recompute when they choose

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod storage;
pub mod ledger;
pub mod itemized;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use types::{Currency, Expense, ExpenseId, Member, NewExpense, SplitPolicy, Trip, TripId};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use ledger::{LedgerChange, TripLedger, MAX_AMOUNT};
pub use itemized::{itemized_shares, itemized_total, Dish};
pub use config::Config;
