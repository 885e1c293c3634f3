//! Deleting logged activities.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use bt_core::{LogId, StateStore, Tracker};
use clap::Args;

use super::util::{Clock, confirm};

const PUMP_WARNING: &str =
    "If this was a pumping session, all associated milk bags will be removed from your stash.";

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// ID of the log to delete.
    pub id: String,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

pub fn run<R: BufRead, W: Write, S: StateStore>(
    reader: &mut R,
    writer: &mut W,
    args: &DeleteArgs,
    tracker: &mut Tracker<S>,
    clock: &Clock,
) -> Result<()> {
    let id = LogId::new(args.id.as_str()).context("invalid log ID")?;
    let Some(prompt) = tracker.logs().get(&id).map(|log| {
        format!(
            "Delete {} at {}? {PUMP_WARNING}",
            log.kind.label(),
            clock.datetime(log.start_time)
        )
    }) else {
        // Unknown ID: let the tracker report it.
        tracker.delete_log(&id)?;
        return Ok(());
    };
    if !args.yes && !confirm(reader, writer, &prompt)? {
        writeln!(writer, "Cancelled.")?;
        return Ok(());
    }

    let removed = tracker.delete_log(&id)?;
    writeln!(writer, "Deleted {} ({})", removed.kind.label(), removed.id)?;
    Ok(())
}
