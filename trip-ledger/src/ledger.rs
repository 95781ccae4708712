//! Trip ledger: trips and their expenses over a key-value store
//!
//! Every mutation publishes a [`LedgerChange`] on a broadcast channel.
//! Nothing recomputes automatically; subscribers decide when to re-run
//! settlement.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use trip_ledger::{Currency, NewExpense, TripLedger};
//!
//! # fn main() -> trip_ledger::Result<()> {
//! let ledger = TripLedger::in_memory();
//! let mut changes = ledger.subscribe();
//!
//! let trip = ledger.create_trip("Goa", Currency::new("INR"), vec!["A", "B", "C"])?;
//! ledger.add_expense(&trip.id, NewExpense::equal("Dinner", Decimal::from(90), "A"))?;
//!
//! assert_eq!(ledger.expenses(&trip.id)?.len(), 1);
//! assert!(changes.try_recv().is_ok());
//! # Ok(())
//! # }
//! ```

use crate::{
    storage::{expenses_key, read_json, write_json, JsonFileStore, KeyValueStore, MemoryStore, TRIPS_KEY},
    types::{Currency, Expense, ExpenseId, Member, NewExpense, SplitPolicy, Trip, TripId},
    Config, Error, Result,
};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Change notification published after every mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerChange {
    /// A trip was created or deleted
    TripsChanged,
    /// Expenses of a trip were added or deleted
    ExpensesChanged {
        /// Affected trip
        trip_id: TripId,
    },
}

/// Largest amount or share accepted on a single expense
///
/// Keeps every trip-level sum far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Main ledger interface
pub struct TripLedger {
    /// Storage backend
    store: Arc<dyn KeyValueStore>,

    /// Change notification sender
    changes: broadcast::Sender<LedgerChange>,

    /// Serializes read-modify-write cycles on the store
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for TripLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripLedger")
            .field("subscribers", &self.changes.receiver_count())
            .finish_non_exhaustive()
    }
}

impl TripLedger {
    /// Open a file-backed ledger
    pub fn open(config: &Config) -> Result<Self> {
        let store = Arc::new(JsonFileStore::open(&config.data_dir)?);
        Ok(Self::with_store(store, config.change_channel_capacity))
    }

    /// Ledger over an in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(
            Arc::new(MemoryStore::new()),
            Config::default().change_channel_capacity,
        )
    }

    /// Ledger over an arbitrary store
    pub fn with_store(store: Arc<dyn KeyValueStore>, channel_capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            store,
            changes,
            write_lock: Mutex::new(()),
        }
    }

    /// Underlying store (shared with other components, e.g. the settlement tracker)
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerChange> {
        self.changes.subscribe()
    }

    fn publish(&self, change: LedgerChange) {
        // No subscribers is fine
        let _ = self.changes.send(change);
    }

    // --- Trips ---

    /// All trips, most recently created first
    pub fn trips(&self) -> Result<Vec<Trip>> {
        Ok(read_json(self.store.as_ref(), TRIPS_KEY)?.unwrap_or_default())
    }

    /// Get trip by ID
    pub fn trip(&self, trip_id: &TripId) -> Result<Trip> {
        self.trips()?
            .into_iter()
            .find(|t| &t.id == trip_id)
            .ok_or_else(|| Error::TripNotFound(trip_id.to_string()))
    }

    /// Create a trip
    pub fn create_trip<I, M>(
        &self,
        name: impl Into<String>,
        currency: Currency,
        members: I,
    ) -> Result<Trip>
    where
        I: IntoIterator<Item = M>,
        M: Into<Member>,
    {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidTrip("Trip name is empty".to_string()));
        }

        let trip = Trip::new(name, currency, members);
        if trip.members.is_empty() {
            tracing::warn!("Trip {} created without members; it cannot be settled", trip.id);
        }

        {
            let _guard = self.write_lock.lock();
            let mut trips = self.trips()?;
            trips.insert(0, trip.clone());
            write_json(self.store.as_ref(), TRIPS_KEY, &trips)?;
        }

        tracing::info!(
            "Created trip {} ({}) with {} members",
            trip.id,
            trip.name,
            trip.members.len()
        );
        self.publish(LedgerChange::TripsChanged);

        Ok(trip)
    }

    /// Delete a trip together with its expenses
    pub fn delete_trip(&self, trip_id: &TripId) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut trips = self.trips()?;
        let before = trips.len();
        trips.retain(|t| &t.id != trip_id);
        if trips.len() == before {
            return Err(Error::TripNotFound(trip_id.to_string()));
        }

        write_json(self.store.as_ref(), TRIPS_KEY, &trips)?;
        self.store.remove(&expenses_key(trip_id))?;

        tracing::info!("Deleted trip {}", trip_id);
        self.publish(LedgerChange::TripsChanged);

        Ok(())
    }

    // --- Expenses ---

    /// Expenses of a trip, in insertion order
    pub fn expenses(&self, trip_id: &TripId) -> Result<Vec<Expense>> {
        Ok(read_json(self.store.as_ref(), &expenses_key(trip_id))?.unwrap_or_default())
    }

    /// Validate and record an expense
    pub fn add_expense(&self, trip_id: &TripId, expense: NewExpense) -> Result<Expense> {
        let expense = {
            let _guard = self.write_lock.lock();
            let trip = self.trip(trip_id)?;
            validate_expense(&trip, &expense)?;

            let expense = expense.into_expense(&trip);
            let mut expenses = self.expenses(trip_id)?;
            expenses.push(expense.clone());
            write_json(self.store.as_ref(), &expenses_key(trip_id), &expenses)?;
            expense
        };

        tracing::debug!(
            "Recorded expense {} on trip {}: {} {} paid by {}",
            expense.id,
            trip_id,
            expense.amount,
            expense.currency,
            expense.payer
        );
        self.publish(LedgerChange::ExpensesChanged {
            trip_id: trip_id.clone(),
        });

        Ok(expense)
    }

    /// Delete an expense
    pub fn delete_expense(&self, trip_id: &TripId, expense_id: &ExpenseId) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut expenses = self.expenses(trip_id)?;
        let before = expenses.len();
        expenses.retain(|e| &e.id != expense_id);
        if expenses.len() == before {
            return Err(Error::ExpenseNotFound(expense_id.to_string()));
        }

        write_json(self.store.as_ref(), &expenses_key(trip_id), &expenses)?;

        tracing::debug!("Deleted expense {} from trip {}", expense_id, trip_id);
        self.publish(LedgerChange::ExpensesChanged {
            trip_id: trip_id.clone(),
        });

        Ok(())
    }
}

/// Reject expenses the balance calculator assumes never happen
fn validate_expense(trip: &Trip, expense: &NewExpense) -> Result<()> {
    if expense.amount <= Decimal::ZERO {
        return Err(Error::InvalidExpense(format!(
            "Amount must be positive, got {}",
            expense.amount
        )));
    }
    if expense.amount > MAX_AMOUNT {
        return Err(Error::InvalidExpense(format!(
            "Amount {} exceeds the limit of {}",
            expense.amount, MAX_AMOUNT
        )));
    }

    if !trip.has_member(&expense.payer) {
        return Err(Error::InvalidExpense(format!(
            "Payer {} is not a member of trip {}",
            expense.payer, trip.id
        )));
    }

    if let SplitPolicy::Custom(shares) = &expense.split {
        for (member, share) in shares {
            if *share < Decimal::ZERO {
                return Err(Error::InvalidExpense(format!(
                    "Share for {} is negative: {}",
                    member, share
                )));
            }
            if *share > MAX_AMOUNT {
                return Err(Error::InvalidExpense(format!(
                    "Share for {} exceeds the limit of {}",
                    member, MAX_AMOUNT
                )));
            }
            if !trip.has_member(member) {
                return Err(Error::InvalidExpense(format!(
                    "Share assigned to {} who is not a member of trip {}",
                    member, trip.id
                )));
            }
        }
    }

    Ok(())
}
