//! Feeding reminders.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use bt_core::reminder::{self, ReminderScheduler};
use bt_core::{StateStore, Tracker};
use chrono::{DateTime, Utc};
use clap::Args;

use super::util::{Clock, format_duration, open_tracker};
use crate::Config;

#[derive(Debug, Args)]
pub struct ReminderArgs {
    /// Keep running and print a reminder when a feed is due.
    #[arg(long)]
    pub watch: bool,
}

/// Prints when the next feed is due.
pub fn run<W: Write, S: StateStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    clock: &Clock,
) -> Result<()> {
    writeln!(writer, "{}", next_due_line(tracker, clock))?;
    Ok(())
}

/// Polls the store until interrupted, printing each reminder as it fires.
pub fn watch<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    runtime.block_on(watch_loop(writer, config))
}

async fn watch_loop<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let period = Duration::from_secs(config.reminder_poll_secs.max(1));
    let mut scheduler = ReminderScheduler::new();
    let mut ticker = tokio::time::interval(period);

    writeln!(writer, "{}", next_due_line(&open_tracker(config)?, &Clock::system()))?;
    writer.flush()?;
    loop {
        ticker.tick().await;
        // Reload each tick so entries logged from other shells count.
        let tracker = open_tracker(config)?;
        check_once(writer, &mut scheduler, &tracker, &Clock::system())?;
        writer.flush()?;
    }
}

/// Runs one reminder check and prints the notification if it fires.
pub fn check_once<W: Write, S: StateStore>(
    writer: &mut W,
    scheduler: &mut ReminderScheduler,
    tracker: &Tracker<S>,
    clock: &Clock,
) -> Result<bool> {
    let Some(profile) = tracker.profile() else {
        return Ok(false);
    };
    let check = scheduler.check(profile, tracker.logs().as_slice(), clock.now);
    let Some(notification) = check.notification else {
        return Ok(false);
    };
    writeln!(
        writer,
        "[{}] {} {}",
        clock.time(clock.now),
        notification.title,
        notification.body
    )?;
    Ok(true)
}

fn next_due_line<S: StateStore>(tracker: &Tracker<S>, clock: &Clock) -> String {
    let Some(profile) = tracker.profile() else {
        return "No profile yet, so no reminders.".to_string();
    };
    if !profile.reminders_enabled {
        return "Reminders are off.".to_string();
    }
    let Some(due) = reminder::next_due(profile, tracker.logs().as_slice()) else {
        return "No feeds logged yet.".to_string();
    };
    format!(
        "Next feed due at {} ({})",
        clock.time(due),
        relative(due, clock.now)
    )
}

fn relative(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (due - now).num_seconds();
    let magnitude = format_duration(seconds.unsigned_abs());
    if seconds >= 0 {
        format!("in {magnitude}")
    } else {
        format!("overdue by {magnitude}")
    }
}
