//! Settlement tracker
//!
//! Remembers which debts the user marked as settled and filters freshly
//! computed transfers against them.
//!
//! Identity is `(from, to, trip)` without the amount, because transfers are
//! recomputed from scratch every time. A consequence: if new expenses grow a
//! pair's debt after it was cleared, the transfer stays hidden until the mark
//! is removed with [`SettlementTracker::unmark`] or
//! [`SettlementTracker::reset_trip`].

use crate::types::{ClearedDebt, Partition, Transfer};
use crate::Result;
use trip_ledger::storage::{read_json, write_json};
use trip_ledger::{KeyValueStore, TripId};

/// Set of cleared debt keys, in the order they were marked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementTracker {
    cleared: Vec<ClearedDebt>,
}

impl SettlementTracker {
    /// Create empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted keys, dropping duplicates
    pub fn from_cleared(keys: impl IntoIterator<Item = ClearedDebt>) -> Self {
        let mut tracker = Self::new();
        for key in keys {
            tracker.insert(key);
        }
        tracker
    }

    /// Load the cleared list stored under `key` (empty if absent)
    pub fn load(store: &dyn KeyValueStore, key: &str) -> Result<Self> {
        let keys: Vec<ClearedDebt> = read_json(store, key)?.unwrap_or_default();
        tracing::debug!("Loaded {} cleared debts from {}", keys.len(), key);
        Ok(Self::from_cleared(keys))
    }

    /// Write the cleared list under `key`
    pub fn persist(&self, store: &dyn KeyValueStore, key: &str) -> Result<()> {
        write_json(store, key, &self.cleared)?;
        Ok(())
    }

    /// Cleared keys
    pub fn cleared(&self) -> &[ClearedDebt] {
        &self.cleared
    }

    /// Mark a transfer as settled
    ///
    /// Returns `false` if the pair was already cleared.
    pub fn mark_cleared(&mut self, transfer: &Transfer) -> bool {
        let added = self.insert(transfer.debt_key());
        if added {
            tracing::info!(
                "Marked {} → {} on trip {} as settled",
                transfer.from,
                transfer.to,
                transfer.trip_id
            );
        }
        added
    }

    /// Check whether a transfer's pair is cleared (amount ignored)
    pub fn is_cleared(&self, transfer: &Transfer) -> bool {
        self.cleared.iter().any(|k| {
            k.from == transfer.from && k.to == transfer.to && k.trip_id == transfer.trip_id
        })
    }

    /// Split transfers into active and cleared, preserving order
    pub fn filter_active(&self, transfers: Vec<Transfer>) -> Partition {
        let (cleared, active) = transfers.into_iter().partition(|t| self.is_cleared(t));
        Partition { active, cleared }
    }

    /// Remove a single cleared mark
    pub fn unmark(&mut self, key: &ClearedDebt) -> bool {
        let before = self.cleared.len();
        self.cleared.retain(|k| k != key);
        before != self.cleared.len()
    }

    /// Remove every cleared mark of a trip, returning how many were removed
    pub fn reset_trip(&mut self, trip_id: &TripId) -> usize {
        let before = self.cleared.len();
        self.cleared.retain(|k| &k.trip_id != trip_id);
        let removed = before - self.cleared.len();
        if removed > 0 {
            tracing::info!("Reset {} cleared debts on trip {}", removed, trip_id);
        }
        removed
    }

    fn insert(&mut self, key: ClearedDebt) -> bool {
        if self.cleared.contains(&key) {
            return false;
        }
        self.cleared.push(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Purpose;
    use rust_decimal::Decimal;
    use trip_ledger::{Member, MemoryStore};

    fn transfer(from: &str, to: &str, amount: i64, trip: &str) -> Transfer {
        Transfer {
            from: Member::new(from),
            to: Member::new(to),
            amount: Decimal::from(amount),
            purpose: Purpose::Unattributed,
            trip_id: TripId::new(trip),
            trip_name: "Goa".to_string(),
        }
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut tracker = SettlementTracker::new();
        assert!(tracker.mark_cleared(&transfer("B", "A", 30, "t1")));
        assert!(!tracker.mark_cleared(&transfer("B", "A", 30, "t1")));
        assert_eq!(tracker.cleared().len(), 1);
    }

    #[test]
    fn test_identity_ignores_amount() {
        let mut tracker = SettlementTracker::new();
        tracker.mark_cleared(&transfer("B", "A", 30, "t1"));

        assert!(tracker.is_cleared(&transfer("B", "A", 45, "t1")));
        assert!(!tracker.is_cleared(&transfer("A", "B", 30, "t1")));
        assert!(!tracker.is_cleared(&transfer("B", "A", 30, "t2")));
    }

    #[test]
    fn test_filter_active() {
        let mut tracker = SettlementTracker::new();
        tracker.mark_cleared(&transfer("C", "A", 30, "t1"));

        let partition = tracker.filter_active(vec![
            transfer("B", "A", 30, "t1"),
            transfer("C", "A", 99, "t1"),
            transfer("D", "A", 10, "t1"),
        ]);

        let active: Vec<&str> = partition.active.iter().map(|t| t.from.as_str()).collect();
        assert_eq!(active, vec!["B", "D"]);
        assert_eq!(partition.cleared.len(), 1);
        assert_eq!(partition.cleared[0].amount, Decimal::from(99));
    }

    #[test]
    fn test_unmark_and_reset() {
        let mut tracker = SettlementTracker::new();
        tracker.mark_cleared(&transfer("B", "A", 30, "t1"));
        tracker.mark_cleared(&transfer("C", "A", 30, "t1"));
        tracker.mark_cleared(&transfer("C", "A", 30, "t2"));

        assert!(tracker.unmark(&ClearedDebt::new("B", "A", TripId::new("t1"))));
        assert!(!tracker.unmark(&ClearedDebt::new("B", "A", TripId::new("t1"))));

        assert_eq!(tracker.reset_trip(&TripId::new("t1")), 1);
        assert_eq!(tracker.cleared(), &[ClearedDebt::new("C", "A", TripId::new("t2"))]);
    }

    #[test]
    fn test_persist_and_load() {
        let store = MemoryStore::new();
        let mut tracker = SettlementTracker::new();
        tracker.mark_cleared(&transfer("B", "A", 30, "t1"));
        tracker.persist(&store, "tp_cleared_debts").unwrap();

        let raw = store.get("tp_cleared_debts").unwrap().unwrap();
        assert_eq!(raw, r#"[{"from":"B","to":"A","tripId":"t1"}]"#);

        let loaded = SettlementTracker::load(&store, "tp_cleared_debts").unwrap();
        assert_eq!(loaded, tracker);
    }

    #[test]
    fn test_load_missing_and_duplicated() {
        let store = MemoryStore::new();
        assert!(SettlementTracker::load(&store, "absent").unwrap().cleared().is_empty());

        store
            .put(
                "dupes",
                r#"[{"from":"B","to":"A","tripId":"t1"},{"from":"B","to":"A","tripId":"t1"}]"#
                    .to_string(),
            )
            .unwrap();
        assert_eq!(SettlementTracker::load(&store, "dupes").unwrap().cleared().len(), 1);
    }
}
