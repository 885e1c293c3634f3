//! Weight and height measurements.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use bt_core::{GrowthLog, GrowthLogId, GrowthPatch, HeightUnit, StateStore, Tracker, WeightUnit};
use clap::Subcommand;

use super::util::{Clock, confirm, parse_datetime};

#[derive(Debug, Subcommand)]
pub enum GrowthAction {
    /// Record a measurement.
    Add {
        /// Weight in the profile's unit.
        #[arg(long)]
        weight: Option<f64>,

        /// Height in the profile's unit.
        #[arg(long)]
        height: Option<f64>,

        /// When it was measured (defaults to now).
        #[arg(long)]
        at: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Change a measurement.
    Edit {
        id: String,

        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        height: Option<f64>,

        #[arg(long)]
        at: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a measurement.
    Delete {
        id: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// List measurements, newest first.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

pub fn run<R: BufRead, W: Write, S: StateStore>(
    reader: &mut R,
    writer: &mut W,
    action: &GrowthAction,
    tracker: &mut Tracker<S>,
    clock: &Clock,
) -> Result<()> {
    let (weight_unit, height_unit) = tracker
        .profile()
        .map(|profile| (profile.weight_unit, profile.height_unit))
        .unwrap_or_default();

    match action {
        GrowthAction::Add {
            weight,
            height,
            at,
            notes,
        } => {
            if weight.is_none() && height.is_none() {
                bail!("pass --weight, --height or both");
            }
            let date = at
                .as_deref()
                .map_or(Ok(clock.now), |at| parse_datetime(at, clock))?;
            let mut log = GrowthLog::new(
                date,
                weight.map(|weight| weight_unit.to_kg(weight)),
                height.map(|height| height_unit.to_cm(height)),
            );
            log.notes.clone_from(notes);
            let summary = describe(&log, weight_unit, height_unit);
            let id = log.id.clone();
            tracker.add_growth(log);
            writeln!(writer, "Recorded {summary} ({id})")?;
        }
        GrowthAction::Edit {
            id,
            weight,
            height,
            at,
            notes,
        } => {
            let id = GrowthLogId::new(id.as_str()).context("invalid measurement ID")?;
            let patch = GrowthPatch {
                date: at
                    .as_deref()
                    .map(|at| parse_datetime(at, clock))
                    .transpose()?,
                weight_kg: weight.map(|weight| weight_unit.to_kg(weight)),
                height_cm: height.map(|height| height_unit.to_cm(height)),
                notes: notes.clone(),
            };
            if patch == GrowthPatch::default() {
                bail!("nothing to change; pass at least one field to edit");
            }
            tracker.update_growth(&id, &patch)?;
            writeln!(writer, "Updated measurement {id}")?;
        }
        GrowthAction::Delete { id, yes } => {
            let id = GrowthLogId::new(id.as_str()).context("invalid measurement ID")?;
            let prompt = format!("Delete measurement {id}?");
            if !yes && !confirm(reader, writer, &prompt)? {
                writeln!(writer, "Cancelled.")?;
                return Ok(());
            }
            let removed = tracker.delete_growth(&id)?;
            writeln!(
                writer,
                "Deleted {} from {}",
                describe(&removed, weight_unit, height_unit),
                clock.local(removed.date).format("%Y-%m-%d")
            )?;
        }
        GrowthAction::List { json } => {
            let logs = tracker.growth().list();
            if *json {
                writeln!(writer, "{}", serde_json::to_string_pretty(&logs)?)?;
            } else if logs.is_empty() {
                writeln!(writer, "No measurements recorded yet.")?;
            } else {
                for log in logs {
                    writeln!(
                        writer,
                        "{}  {:<28} {}",
                        clock.local(log.date).format("%Y-%m-%d"),
                        describe(log, weight_unit, height_unit),
                        log.id
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn describe(log: &GrowthLog, weight_unit: WeightUnit, height_unit: HeightUnit) -> String {
    let mut parts = Vec::new();
    if let Some(kg) = log.weight_kg {
        parts.push(weight_unit.format(kg));
    }
    if let Some(cm) = log.height_cm {
        parts.push(height_unit.format(cm));
    }
    if let Some(notes) = &log.notes {
        parts.push(format!("\"{notes}\""));
    }
    parts.join(", ")
}
