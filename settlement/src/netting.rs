//! Transfer simplifier
//!
//! Reduces net balances to a short list of debtor → creditor transfers
//! using greedy largest-pair matching.
//!
//! # Algorithm
//!
//! 1. Split members into creditors (balance > ε) and debtors (balance < -ε)
//! 2. Sort creditors descending, debtors ascending (most negative first)
//! 3. Sweep both lists with two pointers, transferring
//!    `min(creditor, -debtor)` and advancing whichever side reaches zero
//!
//! # Example
//!
//! ```text
//! Balances:
//!   A: +60   B: -30   C: -30
//!
//! Transfers:
//!   B pays A: 30
//!   C pays A: 30
//! ```
//!
//! Greedy matching is not optimal in general but settles the largest
//! imbalances first, which keeps the transfer count low in common cases.

use crate::types::{Balances, Purpose, Transfer};
use rust_decimal::Decimal;
use trip_ledger::{Expense, Member, SplitPolicy, Trip};

/// Transfer simplifier
#[derive(Debug, Clone)]
pub struct TransferSimplifier {
    /// Balances within this distance of zero are settled
    epsilon: Decimal,
}

impl Default for TransferSimplifier {
    fn default() -> Self {
        Self::new(Decimal::new(1, 4))
    }
}

impl TransferSimplifier {
    /// Create new simplifier
    pub fn new(epsilon: Decimal) -> Self {
        Self { epsilon }
    }

    /// Produce transfers that zero every balance
    ///
    /// Transfers are returned in emission order. Ties keep the member order
    /// of `balances`, so the output is deterministic.
    pub fn simplify(&self, balances: &Balances, expenses: &[Expense], trip: &Trip) -> Vec<Transfer> {
        let mut creditors: Vec<(Member, Decimal)> = balances
            .iter()
            .filter(|b| b.is_creditor(self.epsilon))
            .map(|b| (b.member.clone(), b.balance))
            .collect();

        let mut debtors: Vec<(Member, Decimal)> = balances
            .iter()
            .filter(|b| b.is_debtor(self.epsilon))
            .map(|b| (b.member.clone(), b.balance))
            .collect();

        // Largest creditor first, most negative debtor first (stable)
        creditors.sort_by(|a, b| b.1.cmp(&a.1));
        debtors.sort_by(|a, b| a.1.cmp(&b.1));

        let mut transfers = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < creditors.len() && j < debtors.len() {
            let amount = creditors[i].1.min(-debtors[j].1);

            if amount > self.epsilon {
                let (creditor, debtor) = (&creditors[i].0, &debtors[j].0);
                transfers.push(Transfer {
                    from: debtor.clone(),
                    to: creditor.clone(),
                    amount,
                    purpose: purpose_for(expenses, creditor, debtor),
                    trip_id: trip.id.clone(),
                    trip_name: trip.name.clone(),
                });

                creditors[i].1 -= amount;
                debtors[j].1 += amount;
            }

            if creditors[i].1 <= self.epsilon {
                i += 1;
            }
            if debtors[j].1 >= -self.epsilon {
                j += 1;
            }
        }

        tracing::debug!(
            "Simplified {} balances on trip {} into {} transfers",
            balances.len(),
            trip.id,
            transfers.len()
        );

        transfers
    }
}

/// First expense linking the pair, in either direction
fn purpose_for(expenses: &[Expense], creditor: &Member, debtor: &Member) -> Purpose {
    expenses
        .iter()
        .find(|e| {
            (&e.payer == creditor && involves(&e.split, debtor))
                || (&e.payer == debtor && involves(&e.split, creditor))
        })
        .map(|e| e.description.trim())
        .filter(|d| !d.is_empty())
        .map(|d| Purpose::Labeled(d.to_string()))
        .unwrap_or(Purpose::Unattributed)
}

fn involves(split: &SplitPolicy, member: &Member) -> bool {
    match split {
        SplitPolicy::Equal => true,
        SplitPolicy::Custom(shares) => shares.get(member).is_some_and(|s| !s.is_zero()),
    }
}
