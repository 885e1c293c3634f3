//! The stored milk stash.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use bt_core::milk::{self, Freshness};
use bt_core::{
    InventoryItemId, InventorySummary, MilkInventoryItem, StateStore, StorageMedium, Tracker,
};
use clap::Subcommand;
use serde::Serialize;

use super::util::{Clock, confirm};

#[derive(Debug, Subcommand)]
pub enum StashAction {
    /// List unconsumed bags, soonest expiry first.
    List {
        /// Only bags stored in room, fridge or freezer.
        #[arg(long)]
        storage: Option<StorageMedium>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Remove a bag, shrinking the pump session it came from.
    Remove {
        /// ID of the bag.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StashRow<'a> {
    #[serde(flatten)]
    item: &'a MilkInventoryItem,
    status: Freshness,
    time_remaining: String,
}

#[derive(Debug, Serialize)]
struct StashListing<'a> {
    summary: InventorySummary,
    bags: Vec<StashRow<'a>>,
}

pub fn run<R: BufRead, W: Write, S: StateStore>(
    reader: &mut R,
    writer: &mut W,
    action: &StashAction,
    tracker: &mut Tracker<S>,
    clock: &Clock,
) -> Result<()> {
    match action {
        StashAction::List { storage, json } => list(writer, tracker, *storage, *json, clock),
        StashAction::Remove { id, yes } => remove(reader, writer, tracker, id, *yes),
    }
}

fn list<W: Write, S: StateStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    storage: Option<StorageMedium>,
    json: bool,
    clock: &Clock,
) -> Result<()> {
    let view = milk::stash_view(tracker.inventory().list(), storage);
    let summary = InventorySummary::from_items(view.iter().copied(), clock.now);
    let rows: Vec<_> = view
        .into_iter()
        .map(|item| StashRow {
            item,
            status: item.status(clock.now),
            time_remaining: milk::time_remaining(item.expiry_time, clock.now),
        })
        .collect();

    if json {
        let listing = StashListing {
            summary,
            bags: rows,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&listing)?)?;
        return Ok(());
    }

    if rows.is_empty() {
        writeln!(writer, "The stash is empty.")?;
        return Ok(());
    }

    let unit = tracker
        .profile()
        .map(|profile| profile.volume_unit)
        .unwrap_or_default();
    write!(
        writer,
        "{} bag{}, {} total",
        summary.bags,
        if summary.bags == 1 { "" } else { "s" },
        unit.format(summary.total_volume_ml)
    )?;
    if summary.expiring_soon > 0 {
        write!(writer, ", {} expiring within a day", summary.expiring_soon)?;
    }
    writeln!(writer)?;

    for row in &rows {
        writeln!(
            writer,
            "  {:<8} {:<8} {:<10} pumped {}  {:<10} {}",
            row.item.storage_medium.to_string(),
            unit.format(row.item.volume_ml),
            row.time_remaining,
            clock.datetime(row.item.pumped_at),
            row.status.to_string(),
            row.item.id
        )?;
    }
    Ok(())
}

fn remove<R: BufRead, W: Write, S: StateStore>(
    reader: &mut R,
    writer: &mut W,
    tracker: &mut Tracker<S>,
    id: &str,
    yes: bool,
) -> Result<()> {
    let id = InventoryItemId::new(id).context("invalid bag ID")?;
    let unit = tracker
        .profile()
        .map(|profile| profile.volume_unit)
        .unwrap_or_default();

    let Some(prompt) = tracker.inventory().get(&id).map(|item| {
        format!(
            "Remove this {} {} bag from the stash?",
            unit.format(item.volume_ml),
            item.storage_medium
        )
    }) else {
        tracker.delete_inventory_item(&id)?;
        return Ok(());
    };
    if !yes && !confirm(reader, writer, &prompt)? {
        writeln!(writer, "Cancelled.")?;
        return Ok(());
    }

    let removed = tracker.delete_inventory_item(&id)?;
    writeln!(
        writer,
        "Removed {} bag ({})",
        unit.format(removed.volume_ml),
        removed.id
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use bt_core::state::MemoryStore;
    use bt_core::{ActivityKind, ActivityLog, LogId, Owner, Snapshot};
    use chrono::{DateTime, TimeDelta, Utc};
    use insta::assert_snapshot;

    fn clock() -> Clock {
        Clock::utc(
            DateTime::parse_from_rfc3339("2025-03-10T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    fn bag(id: &str, medium: StorageMedium, hours_ago: i64, source: &LogId) -> MilkInventoryItem {
        let pumped_at = clock().now - TimeDelta::hours(hours_ago);
        MilkInventoryItem {
            id: InventoryItemId::new(id).unwrap(),
            volume_ml: 100.0,
            pumped_at,
            expiry_time: milk::expiry(pumped_at, medium),
            storage_medium: medium,
            is_consumed: false,
            source_log_id: Some(source.clone()),
            notes: None,
        }
    }

    fn tracker() -> Tracker<MemoryStore> {
        let pump_id = LogId::new("pump").unwrap();
        let mut pump = ActivityLog::new(ActivityKind::Pump, clock().now - TimeDelta::hours(80));
        pump.id = pump_id.clone();
        pump.amount_ml = Some(200.0);
        pump.bag_count = Some(2);
        pump.storage_medium = Some(StorageMedium::Fridge);

        let mut consumed = bag("gone", StorageMedium::Fridge, 10, &pump_id);
        consumed.is_consumed = true;

        let snapshot = Snapshot {
            activity_logs: vec![pump],
            milk_inventory: vec![
                bag("frozen", StorageMedium::Freezer, 24, &pump_id),
                bag("old", StorageMedium::Fridge, 80, &pump_id),
                consumed,
            ],
            ..Snapshot::default()
        };
        Tracker::from_snapshot(MemoryStore::new(), Owner::Anonymous, snapshot)
    }

    fn stash<R: BufRead>(
        tracker: &mut Tracker<MemoryStore>,
        input: &mut R,
        action: &StashAction,
    ) -> Result<String> {
        let mut output = Vec::new();
        run(input, &mut output, action, tracker, &clock())?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn list_orders_by_expiry() {
        let output = stash(
            &mut tracker(),
            &mut "".as_bytes(),
            &StashAction::List {
                storage: None,
                json: false,
            },
        )
        .unwrap();
        assert_snapshot!(output, @r"
        2 bags, 200 ml total, 1 expiring within a day
          fridge   100 ml   16 hours   pumped 2025-03-07 04:00  soon       old
          freezer  100 ml   5 months   pumped 2025-03-09 12:00  fresh      frozen
        ");
    }

    #[test]
    fn list_filters_by_storage_as_json() {
        let output = stash(
            &mut tracker(),
            &mut "".as_bytes(),
            &StashAction::List {
                storage: Some(StorageMedium::Freezer),
                json: true,
            },
        )
        .unwrap();
        let listing: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(listing["summary"]["bags"], 1);
        assert_eq!(listing["bags"][0]["id"], "frozen");
        assert_eq!(listing["bags"][0]["status"], "FRESH");
        assert_eq!(listing["bags"][0]["timeRemaining"], "5 months");
    }

    #[test]
    fn remove_shrinks_the_pump_log() {
        let mut tracker = tracker();
        let output = stash(
            &mut tracker,
            &mut "y\n".as_bytes(),
            &StashAction::Remove {
                id: "old".to_string(),
                yes: false,
            },
        )
        .unwrap();
        assert_snapshot!(output, @"Remove this 100 ml fridge bag from the stash? [y/N] Removed 100 ml bag (old)");

        let pump = tracker.logs().get(&LogId::new("pump").unwrap()).unwrap();
        assert_eq!(pump.bag_count, Some(1));
        assert_eq!(pump.amount_ml, Some(100.0));
    }

    #[test]
    fn remove_unknown_bag_fails() {
        let err = stash(
            &mut tracker(),
            &mut "".as_bytes(),
            &StashAction::Remove {
                id: "missing".to_string(),
                yes: true,
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "stash bag not found: missing");
    }
}
