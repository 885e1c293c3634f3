//! Log history grouped by day.

use std::io::Write;

use anyhow::Result;
use bt_core::digest::{self, DailyGroup, DailySummary};
use bt_core::{StateStore, Tracker, VolumeUnit};
use chrono::Local;
use clap::Args;

use super::util::{Clock, Zone, describe};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Only show the most recent N days with activity.
    #[arg(long, short)]
    pub days: Option<usize>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write, S: StateStore>(
    writer: &mut W,
    args: &HistoryArgs,
    tracker: &Tracker<S>,
    clock: &Clock,
) -> Result<()> {
    let logs = tracker.logs().as_slice();
    let mut groups = match clock.zone {
        Zone::Local => digest::daily_summaries(logs, &Local),
        Zone::Fixed(offset) => digest::daily_summaries(logs, &offset),
    };
    if let Some(days) = args.days {
        groups.truncate(days);
    }

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&groups)?)?;
        return Ok(());
    }

    if groups.is_empty() {
        writeln!(writer, "No activity logged yet.")?;
        return Ok(());
    }

    let unit = tracker
        .profile()
        .map(|profile| profile.volume_unit)
        .unwrap_or_default();

    if let Some(hint) = digest::last_nursing_side(logs) {
        writeln!(
            writer,
            "Next side: {} (last nursed on the {} at {})",
            hint.next,
            hint.last.to_string().to_lowercase(),
            clock.time(hint.last_at)
        )?;
        writeln!(writer)?;
    }

    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        write_group(writer, group, unit, clock)?;
    }
    Ok(())
}

fn write_group<W: Write>(
    writer: &mut W,
    group: &DailyGroup<'_>,
    unit: VolumeUnit,
    clock: &Clock,
) -> Result<()> {
    let label = digest::day_label(group.date, clock.today());
    let totals = summary_line(&group.summary, unit);
    if totals.is_empty() {
        writeln!(writer, "{label}")?;
    } else {
        writeln!(writer, "{label}: {totals}")?;
    }
    for log in &group.logs {
        let details = describe(log, unit);
        writeln!(
            writer,
            "  {}  {:<12} {:<28} {}",
            clock.time(log.start_time),
            log.kind.label(),
            details,
            log.id
        )?;
    }
    Ok(())
}

fn summary_line(summary: &DailySummary, unit: VolumeUnit) -> String {
    let mut parts = Vec::new();
    if summary.nursing_minutes > 0 {
        parts.push(format!("{} min nursing", summary.nursing_minutes));
    }
    if summary.bottle_ml > 0.0 {
        parts.push(format!("{} bottle", unit.format(summary.bottle_ml)));
    }
    if summary.sleep_hours > 0.0 {
        parts.push(format!("{:.1} h sleep", summary.sleep_hours));
    }
    if summary.pump_ml > 0.0 {
        parts.push(format!("{} pumped", unit.format(summary.pump_ml)));
    }
    parts.join(", ")
}
