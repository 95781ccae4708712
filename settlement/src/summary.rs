//! Cross-trip debt summary

use crate::tracker::SettlementTracker;
use crate::types::{Partition, Transfer, TripSettlement};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trip_ledger::Member;

/// Outstanding transfers across every trip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSummary {
    transfers: Vec<Transfer>,
}

impl DebtSummary {
    /// Collect transfers of several settlements, in trip order
    pub fn from_settlements(settlements: &[TripSettlement]) -> Self {
        Self {
            transfers: settlements
                .iter()
                .flat_map(|s| s.transfers.iter().cloned())
                .collect(),
        }
    }

    /// All transfers
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Number of transfers
    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    /// True when nothing is left to pay
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Alias of [`DebtSummary::is_empty`] in ledger terms
    pub fn is_settled(&self) -> bool {
        self.is_empty()
    }

    /// Transfers where either side's name contains `query`
    ///
    /// Matching is case-insensitive on the trimmed query; an empty query
    /// keeps everything.
    pub fn for_member(&self, query: &str) -> Self {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }

        let matches = |m: &Member| m.as_str().to_lowercase().contains(&needle);
        Self {
            transfers: self
                .transfers
                .iter()
                .filter(|t| matches(&t.from) || matches(&t.to))
                .cloned()
                .collect(),
        }
    }

    /// Net amount a member receives (positive) or pays (negative)
    pub fn net_for(&self, member: &Member) -> Decimal {
        self.transfers
            .iter()
            .map(|t| {
                if &t.to == member {
                    t.amount
                } else if &t.from == member {
                    -t.amount
                } else {
                    Decimal::ZERO
                }
            })
            .sum()
    }

    /// Split against cleared debts
    pub fn partition(&self, tracker: &SettlementTracker) -> Partition {
        tracker.filter_active(self.transfers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Purpose;
    use trip_ledger::TripId;

    fn transfer(from: &str, to: &str, amount: i64, trip: &str) -> Transfer {
        Transfer {
            from: Member::new(from),
            to: Member::new(to),
            amount: Decimal::from(amount),
            purpose: Purpose::Unattributed,
            trip_id: TripId::new(trip),
            trip_name: trip.to_uppercase(),
        }
    }

    fn summary() -> DebtSummary {
        DebtSummary {
            transfers: vec![
                transfer("Diya", "Arun", 30, "goa"),
                transfer("Meera", "Arun", 20, "goa"),
                transfer("Arun", "Diya", 15, "rome"),
            ],
        }
    }

    #[test]
    fn test_filter_case_insensitive() {
        let filtered = summary().for_member("  diy ");
        assert_eq!(filtered.len(), 2);
        assert!(filtered
            .transfers()
            .iter()
            .all(|t| t.from.as_str() == "Diya" || t.to.as_str() == "Diya"));
    }

    #[test]
    fn test_filter_empty_query_keeps_all() {
        assert_eq!(summary().for_member("   ").len(), 3);
    }

    #[test]
    fn test_filter_no_match_is_settled() {
        let filtered = summary().for_member("Zed");
        assert!(filtered.is_settled());
    }

    #[test]
    fn test_net_for_member() {
        let summary = summary();
        assert_eq!(summary.net_for(&Member::new("Arun")), Decimal::from(35));
        assert_eq!(summary.net_for(&Member::new("Diya")), Decimal::from(-15));
        assert_eq!(summary.net_for(&Member::new("Nobody")), Decimal::ZERO);
    }

    #[test]
    fn test_partition_against_tracker() {
        let summary = summary();
        let mut tracker = SettlementTracker::new();
        tracker.mark_cleared(&summary.transfers()[2]);

        let partition = summary.partition(&tracker);
        assert_eq!(partition.active.len(), 2);
        assert_eq!(partition.cleared[0].trip_name, "ROME");
    }
}
