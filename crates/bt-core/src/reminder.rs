//! Feeding reminders.
//!
//! The next feed is due a fixed interval after the most recent nursing or
//! bottle log. A notification fires at most once per rolling hour, and only
//! while the due time is less than half an hour old.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::log::ActivityLog;
use crate::profile::BabyProfile;

/// How often callers should run [`ReminderScheduler::check`].
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Minutes after the due time during which a notification may still fire.
const FRESHNESS_WINDOW_MINUTES: i64 = 30;

/// Minimum gap between two notifications.
const COOLDOWN_MINUTES: i64 = 60;

/// A reminder ready to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    fn feed(name: &str) -> Self {
        Self {
            title: format!("Time to feed {name}!"),
            body: "It's been a while.".to_string(),
        }
    }
}

/// Result of one reminder check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReminderCheck {
    pub next_due: Option<DateTime<Utc>>,
    pub notification: Option<Notification>,
}

/// When the next feed is due, or `None` if reminders don't apply.
#[must_use]
pub fn next_due<'a>(
    profile: &BabyProfile,
    logs: impl IntoIterator<Item = &'a ActivityLog>,
) -> Option<DateTime<Utc>> {
    if !profile.reminders_enabled || profile.reminder_interval_minutes == 0 {
        return None;
    }
    let last_feed = logs
        .into_iter()
        .filter(|log| log.kind.is_feed())
        .max_by_key(|log| log.start_time)?;
    Some(last_feed.start_time + TimeDelta::minutes(i64::from(profile.reminder_interval_minutes)))
}

/// Tracks when the last notification went out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderScheduler {
    last_notified: Option<DateTime<Utc>>,
}

impl ReminderScheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_notified: None,
        }
    }

    #[must_use]
    pub const fn last_notified(&self) -> Option<DateTime<Utc>> {
        self.last_notified
    }

    /// Computes the next due time and decides whether to notify at `now`.
    pub fn check<'a>(
        &mut self,
        profile: &BabyProfile,
        logs: impl IntoIterator<Item = &'a ActivityLog>,
        now: DateTime<Utc>,
    ) -> ReminderCheck {
        let Some(next_due) = next_due(profile, logs) else {
            return ReminderCheck::default();
        };

        let overdue = now - next_due;
        let fresh = overdue >= TimeDelta::zero()
            && overdue < TimeDelta::minutes(FRESHNESS_WINDOW_MINUTES);
        let cooled = self
            .last_notified
            .is_none_or(|last| now - last > TimeDelta::minutes(COOLDOWN_MINUTES));

        let notification = (fresh && cooled).then(|| {
            self.last_notified = Some(now);
            tracing::debug!(%next_due, "feeding reminder due");
            Notification::feed(&profile.name)
        });

        ReminderCheck {
            next_due: Some(next_due),
            notification,
        }
    }
}
