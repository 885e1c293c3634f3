//! Live nursing/sleep timer.
//!
//! At most one session runs at a time. Stopping converts it into a completed
//! [`ActivityLog`]; starting while one runs stops the old one first.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::activity_kind::TimerKind;
use crate::log::ActivityLog;

/// A session in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimer {
    #[serde(alias = "type")]
    pub kind: TimerKind,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
}

impl ActiveTimer {
    /// Time since the session started; zero if the clock reads earlier.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        (now - self.start_time).max(TimeDelta::zero())
    }

    /// Converts the session into a completed log ending at `now`.
    #[must_use]
    pub fn finish(self, now: DateTime<Utc>) -> ActivityLog {
        let duration = u64::try_from(self.elapsed(now).num_seconds()).unwrap_or(0);
        let mut log = ActivityLog::new(self.kind.into(), self.start_time);
        log.end_time = Some(now);
        log.duration_seconds = Some(duration);
        log
    }
}

/// Timer state: idle, or running one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTimer {
    active: Option<ActiveTimer>,
}

impl SessionTimer {
    #[must_use]
    pub const fn new(active: Option<ActiveTimer>) -> Self {
        Self { active }
    }

    #[must_use]
    pub const fn active(&self) -> Option<&ActiveTimer> {
        self.active.as_ref()
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a session, returning the log of the session it replaced.
    pub fn start(&mut self, kind: TimerKind, now: DateTime<Utc>) -> Option<ActivityLog> {
        let finished = self.stop(now);
        self.active = Some(ActiveTimer {
            kind,
            start_time: now,
        });
        finished
    }

    /// Stops the running session. Idle timers return `None`.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<ActivityLog> {
        self.active.take().map(|timer| timer.finish(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use crate::activity_kind::ActivityKind;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let mut timer = SessionTimer::default();
        assert!(timer.stop(at(0)).is_none());
        assert!(!timer.is_running());
    }

    #[test]
    fn stop_floors_duration_to_seconds() {
        let mut timer = SessionTimer::default();
        assert!(timer.start(TimerKind::Sleep, at(1_000)).is_none());

        let log = timer.stop(at(1_000 + 90_999)).unwrap();
        assert_eq!(log.kind, ActivityKind::Sleep);
        assert_eq!(log.start_time, at(1_000));
        assert_eq!(log.end_time, Some(at(91_999)));
        assert_eq!(log.duration_seconds, Some(90));
        assert!(!timer.is_running());
    }

    #[test]
    fn start_while_running_finalizes_previous() {
        let mut timer = SessionTimer::default();
        timer.start(TimerKind::NursingLeft, at(0));

        let finished = timer.start(TimerKind::NursingRight, at(600_000)).unwrap();
        assert_eq!(finished.kind, ActivityKind::NursingLeft);
        assert_eq!(finished.duration_seconds, Some(600));

        let active = timer.active().unwrap();
        assert_eq!(active.kind, TimerKind::NursingRight);
        assert_eq!(active.start_time, at(600_000));
    }

    #[test]
    fn clock_skew_yields_zero_duration() {
        let timer = ActiveTimer {
            kind: TimerKind::Sleep,
            start_time: at(10_000),
        };
        assert_eq!(timer.finish(at(5_000)).duration_seconds, Some(0));
    }

    #[test]
    fn serde_roundtrip_matches_stored_shape() {
        let timer = ActiveTimer {
            kind: TimerKind::NursingLeft,
            start_time: at(42),
        };
        let json = serde_json::to_string(&timer).unwrap();
        assert_eq!(json, r#"{"kind":"nursing_left","startTime":42}"#);
        let legacy: ActiveTimer =
            serde_json::from_str(r#"{"type":"BREAST_LEFT","startTime":42}"#).unwrap();
        assert_eq!(legacy, timer);
    }
}
