//! Status command: running timer, last feed, stash and reminders at a glance.

use std::io::Write;

use anyhow::{Context, Result};
use bt_core::{Owner, Tracker, digest, reminder};

use super::util::{Clock, format_duration, open_database};
use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config, clock: &Clock) -> Result<()> {
    let owner = config.owner().context("invalid user in configuration")?;
    let db = open_database(config)?;
    let last_saved = db.last_updated(&owner)?;
    let anonymous_data = owner != Owner::Anonymous && db.owners()?.contains(&Owner::Anonymous);
    let tracker = Tracker::hydrate(db, owner).context("failed to load saved state")?;

    writeln!(writer, "Baby tracker status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;
    writeln!(writer, "User:     {}", tracker.owner())?;

    match tracker.profile() {
        Some(profile) => match profile.age_label(clock.today()) {
            Some(age) => writeln!(writer, "Baby:     {}, {age}", profile.name)?,
            None => writeln!(writer, "Baby:     {}", profile.name)?,
        },
        None => writeln!(writer, "Baby:     no profile (bt profile set --name <NAME>)")?,
    }

    match tracker.active_timer() {
        Some(timer) => {
            let elapsed = u64::try_from(timer.elapsed(clock.now).num_seconds()).unwrap_or(0);
            writeln!(
                writer,
                "Timer:    {} for {} (since {})",
                bt_core::ActivityKind::from(timer.kind).label(),
                format_duration(elapsed),
                clock.time(timer.start_time)
            )?;
        }
        None => writeln!(writer, "Timer:    idle")?,
    }

    match tracker.logs().latest_feed() {
        Some(feed) => {
            let ago = u64::try_from((clock.now - feed.start_time).num_seconds()).unwrap_or(0);
            writeln!(
                writer,
                "Last feed: {} at {} ({} ago)",
                feed.kind.label(),
                clock.time(feed.start_time),
                format_duration(ago)
            )?;
        }
        None => writeln!(writer, "Last feed: none logged")?,
    }

    if let Some(hint) = digest::last_nursing_side(tracker.logs().as_slice()) {
        writeln!(writer, "Next side: {}", hint.next)?;
    }

    if let Some(due) = tracker
        .profile()
        .and_then(|profile| reminder::next_due(profile, tracker.logs().as_slice()))
    {
        writeln!(writer, "Next feed: due at {}", clock.time(due))?;
    }

    let unit = tracker
        .profile()
        .map(|profile| profile.volume_unit)
        .unwrap_or_default();
    let stash = tracker.inventory_summary(clock.now);
    if stash.bags == 0 {
        writeln!(writer, "Stash:    empty")?;
    } else {
        writeln!(
            writer,
            "Stash:    {} bag{}, {} ({} expiring within a day)",
            stash.bags,
            if stash.bags == 1 { "" } else { "s" },
            unit.format(stash.total_volume_ml),
            stash.expiring_soon
        )?;
    }

    if let Some(saved) = last_saved {
        writeln!(writer, "Last saved: {}", clock.datetime(saved))?;
    }
    if anonymous_data {
        writeln!(
            writer,
            "Data recorded before sign-in is still anonymous; run `bt migrate` to keep it."
        )?;
    }
    Ok(())
}
