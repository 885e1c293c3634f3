//! Shared utilities for CLI commands.

use std::io::{BufRead, Write};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use bt_core::{ActivityKind, ActivityLog, Tracker, VolumeUnit};
use bt_db::Database;
use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Utc,
};
use regex::Regex;

use crate::Config;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Time zone used to display and interpret wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Local,
    Fixed(FixedOffset),
}

/// The current instant and display zone for one command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub now: DateTime<Utc>,
    pub zone: Zone,
}

impl Clock {
    /// Wall clock in the system time zone.
    pub fn system() -> Self {
        Self {
            now: Utc::now(),
            zone: Zone::Local,
        }
    }

    /// A frozen clock in UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self {
            now,
            zone: Zone::Fixed(Utc.fix()),
        }
    }

    pub fn local(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self.zone {
            Zone::Local => at.with_timezone(&Local).fixed_offset(),
            Zone::Fixed(offset) => at.with_timezone(&offset),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.local(self.now).date_naive()
    }

    /// `HH:MM` in the display zone.
    pub fn time(&self, at: DateTime<Utc>) -> String {
        self.local(at).format("%H:%M").to_string()
    }

    /// `YYYY-MM-DD HH:MM` in the display zone.
    pub fn datetime(&self, at: DateTime<Utc>) -> String {
        self.local(at).format("%Y-%m-%d %H:%M").to_string()
    }

    fn from_local(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.zone {
            Zone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// Parse a datetime string as ISO 8601, local wall-clock time, or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Local: "2026-01-15 10:30" or "2026-01-15" (midnight)
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
/// - "now"
pub fn parse_datetime(s: &str, clock: &Clock) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(clock.now);
    }

    // Try ISO 8601 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").ok().or_else(|| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    });
    if let Some(naive) = naive {
        return clock
            .from_local(naive)
            .with_context(|| format!("{s} does not exist in the local time zone"));
    }

    // Try relative time: "N hours/minutes/days/weeks ago"
    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z), local time (e.g., '2026-01-15 10:30') or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    let duration = Duration::minutes(n * minutes_per_unit);
    Ok(clock.now - duration)
}

/// Opens the configured database, creating its directory if needed.
pub fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

/// Loads the configured owner's session.
pub fn open_tracker(config: &Config) -> Result<Tracker<Database>> {
    let owner = config.owner().context("invalid user in configuration")?;
    let db = open_database(config)?;
    Tracker::hydrate(db, owner).context("failed to load saved state")
}

/// Asks a yes/no question. Anything but `y` or `yes` declines.
pub fn confirm<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, prompt: &str) -> Result<bool> {
    write!(writer, "{prompt} [y/N] ")?;
    writer.flush()?;
    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Compact duration: `1h 05m`, `12m 30s`, `12m`, `45s`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 && secs > 0 {
        format!("{minutes}m {secs:02}s")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{secs}s")
    }
}

/// One-line description of what a log recorded.
pub fn describe(log: &ActivityLog, unit: VolumeUnit) -> String {
    let mut parts = Vec::new();
    match log.kind {
        ActivityKind::NursingLeft | ActivityKind::NursingRight | ActivityKind::Sleep => {
            if let Some(seconds) = log.duration_seconds {
                parts.push(format_duration(seconds));
            }
        }
        ActivityKind::Bottle => {
            if let Some(ml) = log.amount_ml {
                parts.push(unit.format(ml));
            }
            if log.inventory_item_id.is_some() {
                parts.push("from stash".to_string());
            }
        }
        ActivityKind::Solids => {
            if let Some(food) = &log.food_item {
                parts.push(food.clone());
            }
        }
        ActivityKind::Pump => {
            if let Some(ml) = log.amount_ml {
                parts.push(unit.format(ml));
            }
            if let Some(bags) = log.bag_count {
                parts.push(format!("{bags} bag{}", if bags == 1 { "" } else { "s" }));
            }
            if let Some(storage) = log.storage_medium {
                parts.push(storage.to_string());
            }
        }
    }
    if let Some(notes) = &log.notes {
        parts.push(format!("\"{notes}\""));
    }
    parts.join(", ")
}
