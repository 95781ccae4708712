//! Balance calculator
//!
//! Folds a trip's expenses into a net balance per member.
//!
//! # Rules
//!
//! - **Equal**: every member owes `amount / |members|`, the payer is credited
//!   `amount`
//! - **Custom**: every member owes their listed share (absent = 0), the payer
//!   is credited `amount`, and any unallocated remainder
//!   (`amount - Σ shares`) is owed evenly by all members
//!
//! # Example
//!
//! ```text
//! Members [A, B], A pays 100 with shares {B: 40}
//!   remainder = 100 - 40 = 60 → 30 each
//!   A: +100 - 30 = +70
//!   B:  -40 - 30 = -70
//! ```
//!
//! The fold is commutative, so expense order does not matter, and the
//! balances always sum to zero (up to division rounding).

use crate::types::Balances;
use rust_decimal::Decimal;
use trip_ledger::{Expense, Member, SplitPolicy};

/// Balance calculator
#[derive(Debug, Clone)]
pub struct BalanceCalculator {
    /// Custom-split remainders at or below this are ignored
    remainder_epsilon: Decimal,
}

impl Default for BalanceCalculator {
    fn default() -> Self {
        Self::new(Decimal::new(1, 3))
    }
}

impl BalanceCalculator {
    /// Create new calculator
    pub fn new(remainder_epsilon: Decimal) -> Self {
        Self { remainder_epsilon }
    }

    /// Compute net balances for a trip
    ///
    /// A trip without members has no computable balances and yields an
    /// empty map.
    pub fn compute_balances(&self, members: &[Member], expenses: &[Expense]) -> Balances {
        if members.is_empty() {
            tracing::debug!(
                "Skipping {} expenses: trip has no members",
                expenses.len()
            );
            return Balances::default();
        }

        let mut balances = Balances::zeroed(members);
        let head_count = Decimal::from(members.len());

        for expense in expenses {
            if !members.contains(&expense.payer) {
                // Unvalidated input; keep the credit so the sum stays at zero
                tracing::warn!(
                    "Expense {} paid by {} who is not a trip member",
                    expense.id,
                    expense.payer
                );
            }

            match &expense.split {
                SplitPolicy::Equal => {
                    let share = expense.amount / head_count;
                    for member in members {
                        balances.adjust(member, -share);
                    }
                    balances.adjust(&expense.payer, expense.amount);
                }
                SplitPolicy::Custom(shares) => {
                    let mut charged = Decimal::ZERO;
                    for member in members {
                        let owed = shares.get(member).copied().unwrap_or_default();
                        balances.adjust(member, -owed);
                        charged += owed;
                    }
                    balances.adjust(&expense.payer, expense.amount);

                    if shares.keys().any(|m| !members.contains(m)) {
                        tracing::warn!(
                            "Expense {} assigns shares to non-members; those shares are split among members",
                            expense.id
                        );
                    }

                    let remainder = expense.amount - charged;
                    if remainder.abs() > self.remainder_epsilon {
                        let adjustment = remainder / head_count;
                        for member in members {
                            balances.adjust(member, -adjustment);
                        }
                    }
                }
            }
        }

        balances
    }
}
