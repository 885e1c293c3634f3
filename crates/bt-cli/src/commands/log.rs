//! Manual activity entry.

use std::io::Write;

use anyhow::{Context, Result};
use bt_core::{FormSubmission, InventoryItemId, StateStore, StorageMedium, Tracker, VolumeUnit};
use clap::Args;

use super::util::{Clock, describe, parse_datetime};

#[derive(Debug, Args)]
pub struct LogArgs {
    /// nursing, `nursing_left`, `nursing_right`, bottle, solids, sleep or pump.
    pub kind: String,

    /// When it started (defaults to now).
    #[arg(long)]
    pub at: Option<String>,

    /// Nursing side: left or right.
    #[arg(long)]
    pub side: Option<String>,

    /// Nursing duration in minutes.
    #[arg(long)]
    pub minutes: Option<u32>,

    /// Bottle or pump volume in the profile's unit.
    #[arg(long)]
    pub amount: Option<f64>,

    /// Read --amount as fluid ounces.
    #[arg(long)]
    pub oz: bool,

    /// What was eaten (solids).
    #[arg(long)]
    pub food: Option<String>,

    /// When sleep ended (defaults to now).
    #[arg(long)]
    pub end: Option<String>,

    /// Number of bags a pump session was split into.
    #[arg(long)]
    pub bags: Option<i64>,

    /// Where pumped milk is stored: room, fridge or freezer.
    #[arg(long)]
    pub storage: Option<StorageMedium>,

    /// Stash bag a bottle was filled from.
    #[arg(long)]
    pub stash: Option<String>,

    /// Don't add pumped milk to the stash.
    #[arg(long)]
    pub no_stash: bool,

    #[arg(long)]
    pub notes: Option<String>,
}

pub fn run<W: Write, S: StateStore>(
    writer: &mut W,
    args: &LogArgs,
    tracker: &mut Tracker<S>,
    clock: &Clock,
) -> Result<()> {
    let profile_unit = tracker
        .profile()
        .map(|profile| profile.volume_unit)
        .unwrap_or_default();
    let unit = if args.oz { VolumeUnit::Oz } else { profile_unit };

    let submission = FormSubmission {
        kind: args.kind.clone(),
        start_time: args
            .at
            .as_deref()
            .map(|at| parse_datetime(at, clock))
            .transpose()?,
        notes: args.notes.clone(),
        side: args.side.clone(),
        minutes: args.minutes,
        amount: args.amount,
        unit,
        food: args.food.clone(),
        end_time: args
            .end
            .as_deref()
            .map(|end| parse_datetime(end, clock))
            .transpose()?,
        bag_count: args.bags,
        storage: args.storage,
        stash_item: args
            .stash
            .as_deref()
            .map(InventoryItemId::new)
            .transpose()
            .context("invalid stash bag")?,
        skip_inventory: args.no_stash,
    };

    let entry = submission
        .into_entry(clock.now)
        .context("invalid entry")?;
    let log = tracker.add_entry(&entry)?;
    tracing::debug!(id = %log.id, kind = %log.kind, "logged activity");

    let details = describe(&log, profile_unit);
    if details.is_empty() {
        writeln!(
            writer,
            "Logged {} at {} ({})",
            log.kind.label(),
            clock.datetime(log.start_time),
            log.id
        )?;
    } else {
        writeln!(
            writer,
            "Logged {} at {}: {} ({})",
            log.kind.label(),
            clock.datetime(log.start_time),
            details,
            log.id
        )?;
    }
    Ok(())
}
