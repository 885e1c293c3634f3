//! Editing logged activities.

use std::io::Write;

use anyhow::{Context, Result, bail};
use bt_core::{ActivityKind, InventoryItemId, LogId, LogPatch, StateStore, Tracker, VolumeUnit};
use clap::Args;

use super::util::{Clock, describe, parse_datetime};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// ID of the log to change.
    pub id: String,

    /// New activity kind.
    #[arg(long)]
    pub kind: Option<ActivityKind>,

    /// New start time.
    #[arg(long)]
    pub at: Option<String>,

    /// New end time.
    #[arg(long)]
    pub end: Option<String>,

    /// New duration in minutes.
    #[arg(long)]
    pub minutes: Option<u64>,

    /// New volume in the profile's unit.
    #[arg(long)]
    pub amount: Option<f64>,

    /// Read --amount as fluid ounces.
    #[arg(long)]
    pub oz: bool,

    #[arg(long)]
    pub food: Option<String>,

    /// Stash bag the bottle was filled from.
    #[arg(long)]
    pub stash: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

pub fn run<W: Write, S: StateStore>(
    writer: &mut W,
    args: &EditArgs,
    tracker: &mut Tracker<S>,
    clock: &Clock,
) -> Result<()> {
    let id = LogId::new(args.id.as_str()).context("invalid log ID")?;
    let profile_unit = tracker
        .profile()
        .map(|profile| profile.volume_unit)
        .unwrap_or_default();
    let unit = if args.oz { VolumeUnit::Oz } else { profile_unit };

    let patch = LogPatch {
        kind: args.kind,
        start_time: args
            .at
            .as_deref()
            .map(|at| parse_datetime(at, clock))
            .transpose()?,
        end_time: args
            .end
            .as_deref()
            .map(|end| parse_datetime(end, clock))
            .transpose()?,
        duration_seconds: args.minutes.map(|minutes| minutes.saturating_mul(60)),
        amount_ml: args.amount.map(|amount| unit.to_ml(amount)),
        food_item: args.food.clone(),
        inventory_item_id: args
            .stash
            .as_deref()
            .map(InventoryItemId::new)
            .transpose()
            .context("invalid stash bag")?,
        notes: args.notes.clone(),
    };
    if patch.is_empty() {
        bail!("nothing to change; pass at least one field to edit");
    }

    let log = tracker.update_log(&id, &patch)?;
    writeln!(
        writer,
        "Updated {} at {}: {}",
        log.kind.label(),
        clock.datetime(log.start_time),
        describe(&log, profile_unit)
    )?;
    Ok(())
}
