//! Core types for the trip ledger
//!
//! All types are designed for:
//! - JSON-compatible serialization (serde)
//! - Exact arithmetic (Decimal for money)
//! - Case-sensitive member identity

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Trip member, identified by name
///
/// Identity is the exact string: "Diya" and "diya" are different members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Member(String);

impl Member {
    /// Create new member
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Member {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Member {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Trip identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Create new trip ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random ID
    pub fn generate() -> Self {
        Self(short_id())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expense identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Create new expense ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random ID
    pub fn generate() -> Self {
        Self(short_id())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Currency code (ISO 4217), free-form as entered on the trip
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create new currency, normalized to upper case
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    /// ISO 4217 code
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trip: a named group of members sharing a ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Trip ID
    pub id: TripId,

    /// Display name
    pub name: String,

    /// Trip currency
    pub currency: Currency,

    /// Ordered list of unique members
    pub members: Vec<Member>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Create a trip with a fresh ID
    ///
    /// Member names are trimmed, blank names dropped, and exact duplicates
    /// removed keeping the first occurrence.
    pub fn new<I, M>(name: impl Into<String>, currency: Currency, members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Member>,
    {
        Self {
            id: TripId::generate(),
            name: name.into(),
            currency,
            members: normalize_members(members),
            created_at: Utc::now(),
        }
    }

    /// Check membership (exact, case-sensitive)
    pub fn has_member(&self, member: &Member) -> bool {
        self.members.contains(member)
    }
}

fn normalize_members<I, M>(members: I) -> Vec<Member>
where
    I: IntoIterator<Item = M>,
    M: Into<Member>,
{
    let mut out: Vec<Member> = Vec::new();
    for member in members {
        let member: Member = member.into();
        let trimmed = member.as_str().trim();
        if trimmed.is_empty() {
            continue;
        }
        let member = Member::new(trimmed);
        if !out.contains(&member) {
            out.push(member);
        }
    }
    out
}

/// How an expense is divided among trip members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "shares", rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Divided evenly across all trip members, payer included
    Equal,
    /// Explicit per-member owed amounts; any unallocated remainder is
    /// equalized across all members
    Custom(BTreeMap<Member, Decimal>),
}

impl SplitPolicy {
    /// Owed share for a member under a custom split
    ///
    /// Absent entries are zero. Always `None` for equal splits.
    pub fn custom_share(&self, member: &Member) -> Option<Decimal> {
        match self {
            SplitPolicy::Equal => None,
            SplitPolicy::Custom(shares) => Some(shares.get(member).copied().unwrap_or_default()),
        }
    }

    /// Sum of all custom share values (zero for equal splits)
    pub fn shares_total(&self) -> Decimal {
        match self {
            SplitPolicy::Equal => Decimal::ZERO,
            SplitPolicy::Custom(shares) => shares.values().copied().sum(),
        }
    }

    /// True for [`SplitPolicy::Equal`]
    pub fn is_equal(&self) -> bool {
        matches!(self, SplitPolicy::Equal)
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Expense ID
    pub id: ExpenseId,

    /// Trip this expense belongs to
    pub trip_id: TripId,

    /// What was paid for
    pub description: String,

    /// Amount paid (positive)
    pub amount: Decimal,

    /// Currency the expense was recorded in
    pub currency: Currency,

    /// Free-form category ("Food", "Transport", ...)
    pub category: String,

    /// Member who paid
    pub payer: Member,

    /// Split policy
    pub split: SplitPolicy,

    /// Date of the expense
    pub date: NaiveDate,
}

/// Expense as submitted, before an ID is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// What was paid for
    pub description: String,

    /// Amount paid
    pub amount: Decimal,

    /// Currency (defaults to the trip currency when `None`)
    #[serde(default)]
    pub currency: Option<Currency>,

    /// Category
    pub category: String,

    /// Member who paid
    pub payer: Member,

    /// Split policy
    pub split: SplitPolicy,

    /// Date of the expense
    pub date: NaiveDate,
}

impl NewExpense {
    /// Equal-split expense dated today
    pub fn equal(description: impl Into<String>, amount: Decimal, payer: impl Into<Member>) -> Self {
        Self {
            description: description.into(),
            amount,
            currency: None,
            category: "Misc".to_string(),
            payer: payer.into(),
            split: SplitPolicy::Equal,
            date: Utc::now().date_naive(),
        }
    }

    /// Custom-split expense dated today
    pub fn custom(
        description: impl Into<String>,
        amount: Decimal,
        payer: impl Into<Member>,
        shares: BTreeMap<Member, Decimal>,
    ) -> Self {
        Self {
            split: SplitPolicy::Custom(shares),
            ..Self::equal(description, amount, payer)
        }
    }

    /// Set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Assign an ID and attach to a trip
    pub fn into_expense(self, trip: &Trip) -> Expense {
        Expense {
            id: ExpenseId::generate(),
            trip_id: trip.id.clone(),
            description: self.description,
            amount: self.amount,
            currency: self.currency.unwrap_or_else(|| trip.currency.clone()),
            category: self.category,
            payer: self.payer,
            split: self.split,
            date: self.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_members_deduplicated() {
        let trip = Trip::new(
            "Goa",
            Currency::new("inr"),
            vec!["Diya", " Arun ", "Diya", "", "diya"],
        );
        assert_eq!(
            trip.members,
            vec![Member::new("Diya"), Member::new("Arun"), Member::new("diya")]
        );
        assert_eq!(trip.currency.code(), "INR");
        assert!(trip.has_member(&Member::new("Arun")));
        assert!(!trip.has_member(&Member::new("arun")));
    }

    #[test]
    fn test_custom_share_defaults_to_zero() {
        let mut shares = BTreeMap::new();
        shares.insert(Member::new("B"), Decimal::new(4000, 2));
        let split = SplitPolicy::Custom(shares);

        assert_eq!(split.custom_share(&Member::new("B")), Some(Decimal::new(4000, 2)));
        assert_eq!(split.custom_share(&Member::new("C")), Some(Decimal::ZERO));
        assert_eq!(SplitPolicy::Equal.custom_share(&Member::new("B")), None);
        assert_eq!(split.shares_total(), Decimal::from(40));
    }

    #[test]
    fn test_split_policy_json_shape() {
        let json = serde_json::to_value(&SplitPolicy::Equal).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "equal" }));

        let parsed: SplitPolicy =
            serde_json::from_str(r#"{ "type": "custom", "shares": { "B": "40", "C": 12.5 } }"#)
                .unwrap();
        assert_eq!(parsed.custom_share(&Member::new("C")), Some(Decimal::new(125, 1)));
    }

    #[test]
    fn test_new_expense_takes_trip_currency() {
        let trip = Trip::new("Lisbon", Currency::new("EUR"), vec!["A", "B"]);
        let expense = NewExpense::equal("Dinner", Decimal::from(90), "A").into_expense(&trip);
        assert_eq!(expense.trip_id, trip.id);
        assert_eq!(expense.currency, Currency::new("EUR"));
        assert_eq!(expense.id.as_str().len(), 8);
    }
}
