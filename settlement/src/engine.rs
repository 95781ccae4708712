//! Settlement pipeline
//!
//! Runs balance calculation and transfer simplification for one or more
//! trips. Nothing is cached: call again whenever the ledger changes.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use settlement::{NettingConfig, SettlementEngine};
//! use trip_ledger::{Currency, NewExpense, Trip};
//!
//! let trip = Trip::new("Goa", Currency::new("INR"), vec!["A", "B", "C"]);
//! let expenses = vec![NewExpense::equal("Dinner", Decimal::from(90), "A").into_expense(&trip)];
//!
//! let engine = SettlementEngine::new(&NettingConfig::default());
//! let settlement = engine.settle_trip(&trip, &expenses);
//!
//! assert_eq!(settlement.transfers.len(), 2);
//! assert_eq!(settlement.transfers[0].to.as_str(), "A");
//! ```

use crate::{
    balance::BalanceCalculator,
    config::NettingConfig,
    netting::TransferSimplifier,
    summary::DebtSummary,
    tracker::SettlementTracker,
    types::{Partition, TripSettlement},
};
use trip_ledger::{Expense, Trip};

/// Settlement engine
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    /// Balance calculator
    calculator: BalanceCalculator,

    /// Transfer simplifier
    simplifier: TransferSimplifier,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: &NettingConfig) -> Self {
        Self {
            calculator: BalanceCalculator::new(config.remainder_epsilon),
            simplifier: TransferSimplifier::new(config.balance_epsilon),
        }
    }

    /// Settle a single trip
    pub fn settle_trip(&self, trip: &Trip, expenses: &[Expense]) -> TripSettlement {
        let balances = self.calculator.compute_balances(&trip.members, expenses);
        let transfers = self.simplifier.simplify(&balances, expenses, trip);

        tracing::debug!(
            "Settled trip {} ({}): {} expenses → {} transfers",
            trip.id,
            trip.name,
            expenses.len(),
            transfers.len()
        );

        TripSettlement {
            trip_id: trip.id.clone(),
            trip_name: trip.name.clone(),
            currency: trip.currency.clone(),
            balances,
            transfers,
        }
    }

    /// Settle several trips into one summary
    pub fn settle_trips<'a, I>(&self, trips: I) -> DebtSummary
    where
        I: IntoIterator<Item = (&'a Trip, &'a [Expense])>,
    {
        let settlements: Vec<TripSettlement> = trips
            .into_iter()
            .map(|(trip, expenses)| self.settle_trip(trip, expenses))
            .collect();

        let summary = DebtSummary::from_settlements(&settlements);
        tracing::info!(
            "Settlement complete: {} trips, {} outstanding transfers",
            settlements.len(),
            summary.len()
        );
        summary
    }

    /// Settle a trip and split the result against cleared debts
    pub fn settle_with_tracker(
        &self,
        trip: &Trip,
        expenses: &[Expense],
        tracker: &SettlementTracker,
    ) -> Partition {
        tracker.filter_active(self.settle_trip(trip, expenses).transfers)
    }
}
