//! Read-only views over the log history: daily summaries, the compact
//! projection sent for insights, and the nursing side hint.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::activity_kind::ActivityKind;
use crate::entry::Side;
use crate::log::ActivityLog;
use crate::units::VolumeUnit;

/// Most logs included in an insight request.
pub const MAX_INSIGHT_ENTRIES: usize = 50;

/// Per-day totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub nursing_minutes: u64,
    pub bottle_ml: f64,
    pub pump_ml: f64,
    pub sleep_hours: f64,
}

impl DailySummary {
    fn add(&mut self, log: &ActivityLog) {
        match log.kind {
            ActivityKind::NursingLeft | ActivityKind::NursingRight => {
                if let Some(seconds) = log.duration_seconds {
                    self.nursing_minutes += rounded_minutes(seconds);
                }
            }
            ActivityKind::Bottle => self.bottle_ml += log.amount_ml.unwrap_or(0.0),
            ActivityKind::Pump => self.pump_ml += log.amount_ml.unwrap_or(0.0),
            ActivityKind::Sleep => {
                if let Some(seconds) = log.duration_seconds {
                    self.sleep_hours += seconds_as_hours(seconds);
                }
            }
            ActivityKind::Solids => {}
        }
    }
}

/// Logs that started on one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyGroup<'a> {
    pub date: NaiveDate,
    pub summary: DailySummary,
    pub logs: Vec<&'a ActivityLog>,
}

/// Groups logs by local day in `tz`, newest day first and newest log first
/// within each day.
pub fn daily_summaries<'a, Tz: TimeZone>(
    logs: impl IntoIterator<Item = &'a ActivityLog>,
    tz: &Tz,
) -> Vec<DailyGroup<'a>> {
    let mut sorted: Vec<_> = logs.into_iter().collect();
    sorted.sort_by(|a, b| b.start_time.cmp(&a.start_time));

    let mut groups: Vec<DailyGroup<'a>> = Vec::new();
    for log in sorted {
        let date = log.start_time.with_timezone(tz).date_naive();
        if groups.last().is_none_or(|group| group.date != date) {
            groups.push(DailyGroup {
                date,
                summary: DailySummary::default(),
                logs: Vec::new(),
            });
        }
        if let Some(group) = groups.last_mut() {
            group.summary.add(log);
            group.logs.push(log);
        }
    }
    groups
}

/// "Today", "Yesterday", or a weekday and date.
#[must_use]
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (today - date).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        _ => date.format("%A, %b %-d").to_string(),
    }
}

/// One log as described to the insight model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
    pub duration: String,
    pub amount: String,
    pub food: String,
}

const NOT_AVAILABLE: &str = "N/A";

/// The newest [`MAX_INSIGHT_ENTRIES`] logs, flattened to display strings.
pub fn insight_projection<'a, Tz>(
    logs: impl IntoIterator<Item = &'a ActivityLog>,
    unit: VolumeUnit,
    tz: &Tz,
) -> Vec<InsightEntry>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut sorted: Vec<_> = logs.into_iter().collect();
    sorted.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    sorted
        .into_iter()
        .take(MAX_INSIGHT_ENTRIES)
        .map(|log| InsightEntry {
            kind: log.kind.as_str().to_string(),
            time: log
                .start_time
                .with_timezone(tz)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            duration: log
                .duration_seconds
                .filter(|&seconds| seconds > 0)
                .map_or_else(
                    || NOT_AVAILABLE.to_string(),
                    |seconds| format!("{} mins", rounded_minutes(seconds)),
                ),
            amount: log
                .amount_ml
                .filter(|&ml| ml != 0.0)
                .map_or_else(|| NOT_AVAILABLE.to_string(), |ml| insight_amount(ml, unit)),
            food: log
                .food_item
                .clone()
                .filter(|food| !food.is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        })
        .collect()
}

fn insight_amount(ml: f64, unit: VolumeUnit) -> String {
    match unit {
        VolumeUnit::Ml => format!("{ml}ml"),
        VolumeUnit::Oz => format!("{:.1}oz", unit.from_ml(ml)),
    }
}

/// The side of the latest nursing log, and the side to offer next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideHint {
    pub last: Side,
    pub last_at: DateTime<Utc>,
    pub next: Side,
}

#[must_use]
pub fn last_nursing_side<'a>(logs: impl IntoIterator<Item = &'a ActivityLog>) -> Option<SideHint> {
    let latest = logs
        .into_iter()
        .filter(|log| log.kind.is_nursing())
        .max_by_key(|log| log.start_time)?;
    let last = if latest.kind == ActivityKind::NursingLeft {
        Side::Left
    } else {
        Side::Right
    };
    Some(SideHint {
        last,
        last_at: latest.start_time,
        next: last.other(),
    })
}

const fn rounded_minutes(seconds: u64) -> u64 {
    (seconds + 30) / 60
}

#[expect(clippy::cast_precision_loss, reason = "durations are far below 2^52 s")]
fn seconds_as_hours(seconds: u64) -> f64 {
    seconds as f64 / 3600.0
}
