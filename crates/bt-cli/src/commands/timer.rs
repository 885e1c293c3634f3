//! Live nursing and sleep timer.

use std::io::Write;

use anyhow::Result;
use bt_core::{StateStore, TimerKind, Tracker};
use clap::Subcommand;

use super::util::{Clock, format_duration};

#[derive(Debug, Subcommand)]
pub enum TimerAction {
    /// Start a session, finishing any running one.
    Start {
        /// nursing-left, nursing-right or sleep.
        kind: TimerKind,
    },
    /// Stop the running session and log it.
    Stop,
    /// Show the running session.
    Status,
}

pub fn run<W: Write, S: StateStore>(
    writer: &mut W,
    action: &TimerAction,
    tracker: &mut Tracker<S>,
    clock: &Clock,
) -> Result<()> {
    match action {
        TimerAction::Start { kind } => {
            if let Some(finished) = tracker.start_timer_at(*kind, clock.now) {
                writeln!(
                    writer,
                    "Stopped {} after {}",
                    finished.kind.label(),
                    format_duration(finished.duration_seconds.unwrap_or(0))
                )?;
            }
            writeln!(
                writer,
                "Started {} at {}",
                bt_core::ActivityKind::from(*kind).label(),
                clock.time(clock.now)
            )?;
        }
        TimerAction::Stop => match tracker.stop_timer_at(clock.now) {
            Some(log) => writeln!(
                writer,
                "Logged {}: {} ({})",
                log.kind.label(),
                format_duration(log.duration_seconds.unwrap_or(0)),
                log.id
            )?,
            None => writeln!(writer, "No timer running.")?,
        },
        TimerAction::Status => match tracker.active_timer() {
            Some(timer) => {
                let elapsed = u64::try_from(timer.elapsed(clock.now).num_seconds()).unwrap_or(0);
                writeln!(
                    writer,
                    "{} running for {} (since {})",
                    bt_core::ActivityKind::from(timer.kind).label(),
                    format_duration(elapsed),
                    clock.time(timer.start_time)
                )?;
            }
            None => writeln!(writer, "No timer running.")?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use bt_core::state::MemoryStore;
    use bt_core::{Owner, Snapshot};
    use chrono::{DateTime, TimeDelta, Utc};
    use insta::assert_snapshot;

    fn clock(offset_minutes: i64) -> Clock {
        let start = DateTime::parse_from_rfc3339("2025-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Clock::utc(start + TimeDelta::minutes(offset_minutes))
    }

    fn run_action(tracker: &mut Tracker<MemoryStore>, action: &TimerAction, at: i64) -> String {
        let mut output = Vec::new();
        run(&mut output, action, tracker, &clock(at)).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn timer_session_flow() {
        let mut tracker =
            Tracker::from_snapshot(MemoryStore::new(), Owner::Anonymous, Snapshot::default());

        let start = TimerAction::Start {
            kind: TimerKind::NursingLeft,
        };
        assert_snapshot!(run_action(&mut tracker, &start, 0), @"Started Nursing (L) at 08:00");
        assert_snapshot!(
            run_action(&mut tracker, &TimerAction::Status, 12),
            @"Nursing (L) running for 12m (since 08:00)"
        );

        let switch = TimerAction::Start {
            kind: TimerKind::NursingRight,
        };
        assert_snapshot!(run_action(&mut tracker, &switch, 15), @r"
        Stopped Nursing (L) after 15m
        Started Nursing (R) at 08:15
        ");

        let stopped = run_action(&mut tracker, &TimerAction::Stop, 25);
        assert!(stopped.starts_with("Logged Nursing (R): 10m ("));
        assert_eq!(tracker.logs().len(), 2);

        assert_snapshot!(run_action(&mut tracker, &TimerAction::Stop, 30), @"No timer running.");
    }
}
