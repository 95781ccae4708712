//! Spending analytics
//!
//! Totals per trip and per category. Amounts are summed as recorded; no
//! currency conversion is applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trip_ledger::Expense;

/// Spending of one trip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSpending {
    /// Total spent
    pub total: Decimal,

    /// Total per category
    pub per_category: BTreeMap<String, Decimal>,
}

impl TripSpending {
    /// Aggregate a trip's expenses
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut spending = Self::default();
        for expense in expenses {
            spending.total += expense.amount;
            *spending
                .per_category
                .entry(expense.category.clone())
                .or_default() += expense.amount;
        }
        spending
    }

    /// Categories sorted by amount, largest first
    pub fn categories_by_amount(&self) -> Vec<(&str, Decimal)> {
        let mut categories: Vec<(&str, Decimal)> = self
            .per_category
            .iter()
            .map(|(c, a)| (c.as_str(), *a))
            .collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1));
        categories
    }
}

/// Sum of totals across trips
pub fn overall_total<'a>(trips: impl IntoIterator<Item = &'a TripSpending>) -> Decimal {
    trips.into_iter().map(|t| t.total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trip_ledger::{Currency, NewExpense, Trip};

    #[test]
    fn test_spending_by_category() {
        let trip = Trip::new("Goa", Currency::new("INR"), vec!["A", "B"]);
        let expenses = vec![
            NewExpense::equal("Dinner", Decimal::from(90), "A")
                .with_category("Food")
                .into_expense(&trip),
            NewExpense::equal("Taxi", Decimal::from(120), "B")
                .with_category("Transport")
                .into_expense(&trip),
            NewExpense::equal("Lunch", Decimal::new(455, 1), "B")
                .with_category("Food")
                .into_expense(&trip),
        ];

        let spending = TripSpending::from_expenses(&expenses);
        assert_eq!(spending.total, Decimal::new(2555, 1));
        assert_eq!(spending.per_category["Food"], Decimal::new(1355, 1));
        assert_eq!(
            spending.categories_by_amount(),
            vec![
                ("Food", Decimal::new(1355, 1)),
                ("Transport", Decimal::from(120)),
            ]
        );
    }

    #[test]
    fn test_overall_total() {
        let a = TripSpending {
            total: Decimal::from(10),
            ..Default::default()
        };
        let b = TripSpending {
            total: Decimal::new(25, 1),
            ..Default::default()
        };
        assert_eq!(overall_total([&a, &b]), Decimal::new(125, 1));
        assert_eq!(overall_total(std::iter::empty()), Decimal::ZERO);
    }
}
