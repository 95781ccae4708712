//! Itemized (per-dish) share builder
//!
//! Turns a bill of dishes, each split into portions eaten by members, into
//! the share map of a [`SplitPolicy::Custom`](crate::SplitPolicy::Custom)
//! expense.
//!
//! ```text
//! Pizza 30.00, 3 portions: A ate 2, B ate 1  →  A 20.00, B 10.00
//! Salad 12.00, 2 portions: B ate 2           →  B 12.00
//! Shares: A 20.00, B 22.00 (total 42.00)
//! ```

use crate::types::Member;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One dish on a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    /// Dish name
    pub name: String,

    /// Price of the whole dish
    pub price: Decimal,

    /// Number of portions the dish was cut into
    pub portions: u32,

    /// Portions eaten per member
    #[serde(default)]
    pub member_portions: BTreeMap<Member, u32>,
}

impl Dish {
    /// Create a dish nobody has eaten yet
    pub fn new(name: impl Into<String>, price: Decimal, portions: u32) -> Self {
        Self {
            name: name.into(),
            price,
            portions,
            member_portions: BTreeMap::new(),
        }
    }

    /// Record portions eaten by a member
    pub fn eaten_by(mut self, member: impl Into<Member>, portions: u32) -> Self {
        self.member_portions.insert(member.into(), portions);
        self
    }

    /// Cost of a single portion, `None` for free or unportioned dishes
    pub fn cost_per_portion(&self) -> Option<Decimal> {
        if self.portions == 0 || self.price.is_zero() {
            return None;
        }
        Some(self.price / Decimal::from(self.portions))
    }
}

/// Per-member owed amounts across all dishes
pub fn itemized_shares(dishes: &[Dish]) -> BTreeMap<Member, Decimal> {
    let mut shares: BTreeMap<Member, Decimal> = BTreeMap::new();

    for dish in dishes {
        let Some(cost) = dish.cost_per_portion() else {
            continue;
        };
        for (member, eaten) in &dish.member_portions {
            *shares.entry(member.clone()).or_default() += cost * Decimal::from(*eaten);
        }
    }

    shares
}

/// Bill total as allocated to members
pub fn itemized_total(shares: &BTreeMap<Member, Decimal>) -> Decimal {
    shares.values().copied().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_shares_across_dishes() {
        let dishes = vec![
            Dish::new("Pizza", Decimal::new(3000, 2), 3)
                .eaten_by("A", 2)
                .eaten_by("B", 1),
            Dish::new("Salad", Decimal::new(1200, 2), 2).eaten_by("B", 2),
        ];

        let shares = itemized_shares(&dishes);
        assert_eq!(shares[&Member::new("A")], Decimal::from(20));
        assert_eq!(shares[&Member::new("B")], Decimal::from(22));
        assert_eq!(itemized_total(&shares), Decimal::from(42));
    }

    #[test]
    fn test_skips_free_and_unportioned_dishes() {
        let dishes = vec![
            Dish::new("Water", Decimal::ZERO, 4).eaten_by("A", 1),
            Dish::new("Bread", Decimal::from(5), 0).eaten_by("B", 1),
        ];
        assert!(itemized_shares(&dishes).is_empty());
    }

    #[test]
    fn test_uneaten_portions_are_unallocated() {
        let dishes = vec![Dish::new("Cake", Decimal::from(40), 4).eaten_by("A", 1)];
        let shares = itemized_shares(&dishes);
        assert_eq!(itemized_total(&shares), Decimal::from(10));
    }

    proptest! {
        /// Property: fully eaten dishes allocate exactly their price
        #[test]
        fn prop_fully_eaten_bill_is_allocated(
            cents in 1i64..100_000,
            a in 0u32..10,
            b in 0u32..10,
        ) {
            prop_assume!(a + b > 0);
            let dish = Dish::new("Dish", Decimal::new(cents, 2), a + b)
                .eaten_by("A", a)
                .eaten_by("B", b);

            let total = itemized_total(&itemized_shares(&[dish]));
            prop_assert!((total - Decimal::new(cents, 2)).abs() < Decimal::new(1, 6));
        }
    }
}
