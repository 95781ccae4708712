//! Core types for settlement

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use trip_ledger::{Currency, Member, TripId};

/// Net position of one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    /// Member
    pub member: Member,

    /// Net balance (positive = is owed money, negative = owes money)
    pub balance: Decimal,
}

impl MemberBalance {
    /// Check if net creditor beyond tolerance
    pub fn is_creditor(&self, epsilon: Decimal) -> bool {
        self.balance > epsilon
    }

    /// Check if net debtor beyond tolerance
    pub fn is_debtor(&self, epsilon: Decimal) -> bool {
        self.balance < -epsilon
    }
}

/// Net balance per member, in trip member order
///
/// Members with no activity still appear with a zero balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<MemberBalance>", into = "Vec<MemberBalance>")]
pub struct Balances {
    entries: Vec<MemberBalance>,

    /// Position of each member in `entries`
    index: BTreeMap<Member, usize>,
}

impl Balances {
    /// Every member at zero
    pub fn zeroed(members: &[Member]) -> Self {
        let mut balances = Self::default();
        for member in members {
            balances.adjust(member, Decimal::ZERO);
        }
        balances
    }

    /// Build from explicit `(member, balance)` pairs
    ///
    /// Repeated members are summed into the first occurrence.
    pub fn from_entries<I, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (M, Decimal)>,
        M: Into<Member>,
    {
        let mut balances = Self::default();
        for (member, amount) in entries {
            balances.adjust(&member.into(), amount);
        }
        balances
    }

    /// Balance of a member
    pub fn get(&self, member: &Member) -> Option<Decimal> {
        self.index.get(member).map(|&i| self.entries[i].balance)
    }

    /// Add `delta` to a member, appending the member if unseen
    pub fn adjust(&mut self, member: &Member, delta: Decimal) {
        match self.index.get(member) {
            Some(&i) => self.entries[i].balance += delta,
            None => {
                self.index.insert(member.clone(), self.entries.len());
                self.entries.push(MemberBalance {
                    member: member.clone(),
                    balance: delta,
                });
            }
        }
    }

    /// Iterate in member order
    pub fn iter(&self) -> impl Iterator<Item = &MemberBalance> {
        self.entries.iter()
    }

    /// Sum of all balances (zero for any well-formed expense set)
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.balance).sum()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no members are tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<MemberBalance>> for Balances {
    fn from(entries: Vec<MemberBalance>) -> Self {
        Self::from_entries(entries.into_iter().map(|e| (e.member, e.balance)))
    }
}

impl From<Balances> for Vec<MemberBalance> {
    fn from(balances: Balances) -> Self {
        balances.entries
    }
}

/// Best-effort label for a transfer
///
/// The label comes from a heuristic search over the trip's expenses and
/// never affects amounts. When several expenses qualify the first one wins,
/// which may not be the expense that actually caused the debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Purpose {
    /// Description of a related expense
    Labeled(String),
    /// No related expense found
    Unattributed,
}

impl Purpose {
    /// Display label ("Shared expense" when unattributed)
    pub fn label(&self) -> &str {
        match self {
            Purpose::Labeled(text) => text.as_str(),
            Purpose::Unattributed => "Shared expense",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Proposed payment from a debtor to a creditor
///
/// Regenerated from balances on every query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    /// Debtor (pays)
    pub from: Member,

    /// Creditor (receives)
    pub to: Member,

    /// Amount to pay (positive)
    pub amount: Decimal,

    /// Best-effort purpose
    pub purpose: Purpose,

    /// Trip the debt belongs to
    pub trip_id: TripId,

    /// Trip display name
    pub trip_name: String,
}

impl Transfer {
    /// Identity key used by the settlement tracker
    pub fn debt_key(&self) -> ClearedDebt {
        ClearedDebt {
            from: self.from.clone(),
            to: self.to.clone(),
            trip_id: self.trip_id.clone(),
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} owes {}: {} ({})",
            self.from,
            self.to,
            self.amount.round_dp(2),
            self.trip_name
        )
    }
}

/// Identity of a debt the user marked as settled
///
/// Carries no amount: a recomputed transfer between the same pair on the
/// same trip matches regardless of its current amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearedDebt {
    /// Debtor
    pub from: Member,

    /// Creditor
    pub to: Member,

    /// Trip
    pub trip_id: TripId,
}

impl ClearedDebt {
    /// Create new key
    pub fn new(from: impl Into<Member>, to: impl Into<Member>, trip_id: TripId) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            trip_id,
        }
    }
}

/// Transfers split against the cleared set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Still outstanding
    pub active: Vec<Transfer>,

    /// Marked as settled
    pub cleared: Vec<Transfer>,
}

/// Result of settling one trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSettlement {
    /// Trip ID
    pub trip_id: TripId,

    /// Trip name
    pub trip_name: String,

    /// Trip currency
    pub currency: Currency,

    /// Net balances
    pub balances: Balances,

    /// Simplified transfers, in emission order
    pub transfers: Vec<Transfer>,
}

impl TripSettlement {
    /// True when nobody owes anything
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balances_keep_member_order() {
        let members = vec![Member::new("C"), Member::new("A"), Member::new("B")];
        let mut balances = Balances::zeroed(&members);

        balances.adjust(&Member::new("A"), Decimal::from(10));
        balances.adjust(&Member::new("B"), Decimal::from(-10));

        let order: Vec<&str> = balances.iter().map(|e| e.member.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        assert_eq!(balances.get(&Member::new("C")), Some(Decimal::ZERO));
        assert_eq!(balances.total(), Decimal::ZERO);
    }

    #[test]
    fn test_balances_from_entries_merges_repeats() {
        let balances = Balances::from_entries(vec![
            ("A", Decimal::from(5)),
            ("B", Decimal::from(-8)),
            ("A", Decimal::from(3)),
        ]);
        assert_eq!(balances.len(), 2);
        assert_eq!(balances.get(&Member::new("A")), Some(Decimal::from(8)));
    }

    #[test]
    fn test_balances_json_is_ordered_list() {
        let balances = Balances::from_entries(vec![("B", Decimal::from(-4)), ("A", Decimal::from(4))]);

        let json = serde_json::to_value(&balances).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
        assert_eq!(json[0]["member"], "B");

        let restored: Balances = serde_json::from_value(json).unwrap();
        assert_eq!(restored.get(&Member::new("A")), Some(Decimal::from(4)));
        assert_eq!(restored, balances);
    }

    #[test]
    fn test_purpose_label() {
        assert_eq!(Purpose::Labeled("Dinner".into()).label(), "Dinner");
        assert_eq!(Purpose::Unattributed.to_string(), "Shared expense");
    }

    #[test]
    fn test_transfer_display() {
        let transfer = Transfer {
            from: Member::new("B"),
            to: Member::new("A"),
            amount: Decimal::new(333333, 4),
            purpose: Purpose::Unattributed,
            trip_id: TripId::new("t1"),
            trip_name: "Goa".to_string(),
        };
        assert_eq!(transfer.to_string(), "B owes A: 33.33 (Goa)");
    }

    #[test]
    fn test_cleared_debt_json_shape() {
        let debt = ClearedDebt::new("B", "A", TripId::new("t1"));
        let json = serde_json::to_value(&debt).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "from": "B", "to": "A", "tripId": "t1" })
        );
    }
}
