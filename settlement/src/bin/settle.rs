//! Settlement report binary
//!
//! ```text
//! settle [MEMBER]                  Show outstanding and cleared transfers
//! settle clear FROM TO TRIP_ID     Mark a transfer as settled
//! settle reset TRIP_ID             Forget every settled mark of a trip
//! ```

use anyhow::{bail, Context};
use settlement::{Config, DebtSummary, SettlementEngine, SettlementTracker};
use trip_ledger::{Member, TripId, TripLedger};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match std::env::var("SETTLEMENT_CONFIG") {
        Ok(path) => Config::from_file(&path).with_context(|| format!("loading {}", path))?,
        Err(_) => Config::from_env()?,
    };

    let ledger = TripLedger::open(&config.ledger)
        .with_context(|| format!("opening ledger at {:?}", config.ledger.data_dir))?;
    let store = ledger.store();
    let key = config.tracker.storage_key.as_str();
    let mut tracker = SettlementTracker::load(store.as_ref(), key)?;
    let engine = SettlementEngine::new(&config.netting);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["clear", from, to, trip_id] => {
            let trip_id = TripId::new(*trip_id);
            let summary = settle_all(&ledger, &engine)?;
            let Some(transfer) = summary.transfers().iter().find(|t| {
                t.trip_id == trip_id && t.from == Member::new(*from) && t.to == Member::new(*to)
            }) else {
                bail!("no outstanding transfer {} → {} on trip {}", from, to, trip_id);
            };

            if tracker.mark_cleared(transfer) {
                tracker.persist(store.as_ref(), key)?;
            }
            println!("Settled: {}", transfer);
        }
        ["reset", trip_id] => {
            let removed = tracker.reset_trip(&TripId::new(*trip_id));
            tracker.persist(store.as_ref(), key)?;
            println!("Reset {} settled debts", removed);
        }
        [] | [_] => {
            let member = args.first().map(String::as_str).unwrap_or("");
            let summary = settle_all(&ledger, &engine)?.for_member(member);
            let partition = summary.partition(&tracker);

            if partition.active.is_empty() {
                if member.is_empty() {
                    println!("All settled up!");
                } else {
                    println!("All settled up for {}!", member.trim());
                }
            }
            for transfer in &partition.active {
                println!("{}\n    Purpose: {}", transfer, transfer.purpose);
            }
            if !partition.cleared.is_empty() {
                println!("\nSettled:");
                for transfer in &partition.cleared {
                    println!("  {}", transfer);
                }
            }
        }
        _ => bail!("usage: settle [MEMBER] | settle clear FROM TO TRIP_ID | settle reset TRIP_ID"),
    }

    Ok(())
}

fn settle_all(ledger: &TripLedger, engine: &SettlementEngine) -> anyhow::Result<DebtSummary> {
    let trips = ledger.trips()?;
    let mut expenses = Vec::with_capacity(trips.len());
    for trip in &trips {
        expenses.push(ledger.expenses(&trip.id)?);
    }

    Ok(engine.settle_trips(
        trips
            .iter()
            .zip(expenses.iter())
            .map(|(trip, exps)| (trip, exps.as_slice())),
    ))
}
