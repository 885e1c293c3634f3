//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::delete::DeleteArgs;
use crate::commands::edit::EditArgs;
use crate::commands::growth::GrowthAction;
use crate::commands::history::HistoryArgs;
use crate::commands::log::LogArgs;
use crate::commands::profile::ProfileAction;
use crate::commands::reminder::ReminderArgs;
use crate::commands::stash::StashAction;
use crate::commands::timer::TimerAction;

/// Baby feeding, sleep and milk stash tracker.
///
/// Times nursing and sleep sessions, logs bottles, solids and pumping,
/// keeps track of stored milk and its shelf life, and reminds you when the
/// next feed is due.
#[derive(Debug, Parser)]
#[command(name = "bt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the running timer, stash and next feed.
    Status,

    /// Start, stop or inspect the live timer.
    Timer {
        #[command(subcommand)]
        action: TimerAction,
    },

    /// Record a past feed, sleep or pump session.
    Log(LogArgs),

    /// Change fields of a logged activity.
    Edit(EditArgs),

    /// Delete a logged activity.
    Delete(DeleteArgs),

    /// Show logged activities grouped by day.
    History(HistoryArgs),

    /// Inspect or remove stored milk bags.
    Stash {
        #[command(subcommand)]
        action: StashAction,
    },

    /// Record weight and height measurements.
    Growth {
        #[command(subcommand)]
        action: GrowthAction,
    },

    /// Show or change the baby profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Show when the next feed is due.
    Reminder(ReminderArgs),

    /// Summarize recent activity with Claude.
    Insights,

    /// Move data recorded before sign-in to the configured user.
    Migrate,
}
