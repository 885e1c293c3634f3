//! Manual entry submissions and their mapping into activity logs.
//!
//! Entry forms produce loosely-shaped [`FormSubmission`]s. They are checked
//! once, at the boundary, into a [`NewEntry`] whose [`EntryDetails`] variant
//! carries exactly the fields its kind needs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::activity_kind::{ActivityKind, UnknownActivityKind};
use crate::log::ActivityLog;
use crate::milk::StorageMedium;
use crate::types::{InventoryItemId, ValidationError};
use crate::units::VolumeUnit;

/// Errors turning a form submission into an entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error(transparent)]
    UnknownKind(#[from] UnknownActivityKind),

    #[error("{kind} entries need {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Breast side for nursing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub const fn kind(self) -> ActivityKind {
        match self {
            Self::Left => ActivityKind::NursingLeft,
            Self::Right => ActivityKind::NursingRight,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "Left",
            Self::Right => "Right",
        })
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            _ => Err(ValidationError::InvalidValue {
                field: "side",
                value: s.to_string(),
            }),
        }
    }
}

/// Kind-specific payload of a new entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryDetails {
    Nursing {
        side: Side,
        minutes: u32,
    },
    Bottle {
        amount_ml: f64,
        /// Stash bag the bottle was filled from.
        from_stash: Option<InventoryItemId>,
    },
    Solids {
        food: String,
    },
    Sleep {
        end: DateTime<Utc>,
    },
    Pump {
        amount_ml: f64,
        /// Clamped to at least one bag.
        bag_count: u32,
        storage: StorageMedium,
        /// Whether the bags go into the stash.
        track_inventory: bool,
    },
}

/// A validated manual entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub start_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub details: EntryDetails,
}

impl NewEntry {
    /// Builds the log this entry describes.
    #[must_use]
    pub fn to_log(&self) -> ActivityLog {
        let mut log = match &self.details {
            EntryDetails::Nursing { side, minutes } => nursing_log(self.start_time, *side, *minutes),
            EntryDetails::Bottle {
                amount_ml,
                from_stash,
            } => bottle_log(self.start_time, *amount_ml, from_stash.clone()),
            EntryDetails::Solids { food } => solids_log(self.start_time, food),
            EntryDetails::Sleep { end } => sleep_log(self.start_time, *end),
            EntryDetails::Pump {
                amount_ml,
                bag_count,
                storage,
                ..
            } => pump_log(self.start_time, *amount_ml, *bag_count, *storage),
        };
        log.notes = self.notes.clone().filter(|notes| !notes.trim().is_empty());
        log
    }

    /// True for a pump entry whose bags should go into the stash.
    #[must_use]
    pub const fn tracks_inventory(&self) -> bool {
        matches!(
            self.details,
            EntryDetails::Pump {
                track_inventory: true,
                ..
            }
        )
    }
}

fn nursing_log(start: DateTime<Utc>, side: Side, minutes: u32) -> ActivityLog {
    let mut log = ActivityLog::new(side.kind(), start);
    log.duration_seconds = Some(u64::from(minutes) * 60);
    log
}

fn bottle_log(
    start: DateTime<Utc>,
    amount_ml: f64,
    from_stash: Option<InventoryItemId>,
) -> ActivityLog {
    let mut log = ActivityLog::new(ActivityKind::Bottle, start);
    log.amount_ml = Some(non_negative(amount_ml));
    log.inventory_item_id = from_stash;
    log
}

fn solids_log(start: DateTime<Utc>, food: &str) -> ActivityLog {
    let mut log = ActivityLog::new(ActivityKind::Solids, start);
    log.food_item = Some(food.to_string());
    log
}

fn sleep_log(start: DateTime<Utc>, end: DateTime<Utc>) -> ActivityLog {
    let mut log = ActivityLog::new(ActivityKind::Sleep, start);
    let seconds = (end - start).num_seconds().max(0);
    log.end_time = Some(end);
    log.duration_seconds = Some(u64::try_from(seconds).unwrap_or(0));
    log
}

fn pump_log(
    start: DateTime<Utc>,
    amount_ml: f64,
    bag_count: u32,
    storage: StorageMedium,
) -> ActivityLog {
    let mut log = ActivityLog::new(ActivityKind::Pump, start);
    log.amount_ml = Some(non_negative(amount_ml));
    log.bag_count = Some(bag_count.max(1));
    log.storage_medium = Some(storage);
    log
}

/// Non-finite or negative amounts become zero.
fn non_negative(amount_ml: f64) -> f64 {
    if amount_ml.is_finite() && amount_ml > 0.0 {
        amount_ml
    } else {
        0.0
    }
}

/// Raw fields from an entry form, before the kind is known to be valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSubmission {
    pub kind: String,
    pub start_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// Nursing side, `left` or `right`.
    pub side: Option<String>,
    pub minutes: Option<u32>,
    /// Volume in `unit`.
    pub amount: Option<f64>,
    pub unit: VolumeUnit,
    pub food: Option<String>,
    pub end_time: Option<DateTime<Utc>>,
    pub bag_count: Option<i64>,
    pub storage: Option<StorageMedium>,
    pub stash_item: Option<InventoryItemId>,
    /// Pump bags skip the stash when set.
    pub skip_inventory: bool,
}

impl FormSubmission {
    /// Validates the submission. `now` fills in missing start and end times.
    pub fn into_entry(self, now: DateTime<Utc>) -> Result<NewEntry, EntryError> {
        let start_time = self.start_time.unwrap_or(now);
        let unit = self.unit;
        let amount_ml = self.amount.map(|amount| unit.to_ml(amount));

        let details = match self.kind.as_str() {
            "nursing" => {
                let side = self
                    .side
                    .as_deref()
                    .ok_or(EntryError::MissingField {
                        kind: "nursing",
                        field: "a side",
                    })?
                    .parse()?;
                EntryDetails::Nursing {
                    side,
                    minutes: self.minutes.unwrap_or(0),
                }
            }
            kind => match kind.parse::<ActivityKind>()? {
                ActivityKind::NursingLeft => EntryDetails::Nursing {
                    side: Side::Left,
                    minutes: self.minutes.unwrap_or(0),
                },
                ActivityKind::NursingRight => EntryDetails::Nursing {
                    side: Side::Right,
                    minutes: self.minutes.unwrap_or(0),
                },
                ActivityKind::Bottle => EntryDetails::Bottle {
                    amount_ml: amount_ml.ok_or(EntryError::MissingField {
                        kind: "bottle",
                        field: "an amount",
                    })?,
                    from_stash: self.stash_item,
                },
                ActivityKind::Solids => EntryDetails::Solids {
                    food: self.food.ok_or(EntryError::MissingField {
                        kind: "solids",
                        field: "a food item",
                    })?,
                },
                ActivityKind::Sleep => EntryDetails::Sleep {
                    end: self.end_time.unwrap_or(now),
                },
                ActivityKind::Pump => EntryDetails::Pump {
                    amount_ml: amount_ml.unwrap_or(0.0),
                    bag_count: clamp_bag_count(self.bag_count.unwrap_or(1)),
                    storage: self.storage.unwrap_or(StorageMedium::Fridge),
                    track_inventory: !self.skip_inventory,
                },
            },
        };

        Ok(NewEntry {
            start_time,
            notes: self.notes,
            details,
        })
    }
}

fn clamp_bag_count(count: i64) -> u32 {
    u32::try_from(count.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeDelta, TimeZone};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn form(kind: &str) -> FormSubmission {
        FormSubmission {
            kind: kind.to_string(),
            start_time: Some(at(0)),
            ..FormSubmission::default()
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = form("tummy_time").into_entry(at(0)).unwrap_err();
        assert!(matches!(err, EntryError::UnknownKind(_)));
    }

    #[test]
    fn nursing_minutes_become_seconds() {
        let entry = FormSubmission {
            side: Some("right".to_string()),
            minutes: Some(12),
            ..form("nursing")
        }
        .into_entry(at(0))
        .unwrap();
        let log = entry.to_log();
        assert_eq!(log.kind, ActivityKind::NursingRight);
        assert_eq!(log.duration_seconds, Some(720));
    }

    #[test]
    fn nursing_without_side_is_rejected() {
        let err = form("nursing").into_entry(at(0)).unwrap_err();
        assert_eq!(err.to_string(), "nursing entries need a side");
    }

    #[test]
    fn bottle_in_ounces_is_stored_in_ml() {
        let item = InventoryItemId::new("bag-1").unwrap();
        let entry = FormSubmission {
            amount: Some(4.0),
            unit: VolumeUnit::Oz,
            stash_item: Some(item.clone()),
            ..form("bottle")
        }
        .into_entry(at(0))
        .unwrap();
        let log = entry.to_log();
        assert!((log.amount_ml.unwrap() - 118.294).abs() < 1e-9);
        assert_eq!(log.inventory_item_id, Some(item));
    }

    #[test]
    fn sleep_duration_is_clamped_at_zero() {
        let entry = FormSubmission {
            end_time: Some(at(0) - TimeDelta::minutes(5)),
            ..form("sleep")
        }
        .into_entry(at(0))
        .unwrap();
        assert_eq!(entry.to_log().duration_seconds, Some(0));

        let entry = form("sleep").into_entry(at(3_600_500)).unwrap();
        let log = entry.to_log();
        assert_eq!(log.end_time, Some(at(3_600_500)));
        assert_eq!(log.duration_seconds, Some(3600));
    }

    #[test]
    fn pump_clamps_bag_count_and_amount() {
        let entry = FormSubmission {
            amount: Some(-10.0),
            bag_count: Some(-2),
            ..form("pump")
        }
        .into_entry(at(0))
        .unwrap();
        assert!(entry.tracks_inventory());
        let log = entry.to_log();
        assert_eq!(log.bag_count, Some(1));
        assert_eq!(log.amount_ml, Some(0.0));
        assert_eq!(log.storage_medium, Some(StorageMedium::Fridge));
    }

    #[test]
    fn pump_can_skip_inventory() {
        let entry = FormSubmission {
            amount: Some(120.0),
            skip_inventory: true,
            ..form("pump")
        }
        .into_entry(at(0))
        .unwrap();
        assert!(!entry.tracks_inventory());
    }

    #[test]
    fn blank_notes_are_dropped() {
        let entry = FormSubmission {
            food: Some("pear".to_string()),
            notes: Some("  ".to_string()),
            ..form("solids")
        }
        .into_entry(at(0))
        .unwrap();
        let log = entry.to_log();
        assert_eq!(log.food_item.as_deref(), Some("pear"));
        assert_eq!(log.notes, None);
    }
}
