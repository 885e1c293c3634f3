//! Stored milk: shelf life, freshness, and splitting a pump session into bags.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{InventoryItemId, LogId, ValidationError};

/// Where a bag of milk is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageMedium {
    Room,
    Fridge,
    Freezer,
}

impl StorageMedium {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Fridge => "fridge",
            Self::Freezer => "freezer",
        }
    }

    /// Maximum safe storage duration.
    ///
    /// The freezer figure is a flat 180 days rather than six calendar months.
    #[must_use]
    pub fn shelf_life(self) -> TimeDelta {
        match self {
            Self::Room => TimeDelta::hours(4),
            Self::Fridge => TimeDelta::hours(4 * 24),
            Self::Freezer => TimeDelta::hours(6 * 30 * 24),
        }
    }
}

impl fmt::Display for StorageMedium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageMedium {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "room" => Ok(Self::Room),
            "fridge" => Ok(Self::Fridge),
            "freezer" => Ok(Self::Freezer),
            _ => Err(ValidationError::InvalidValue {
                field: "storage medium",
                value: s.to_string(),
            }),
        }
    }
}

/// When milk pumped at `pumped_at` stops being usable.
#[must_use]
pub fn expiry(pumped_at: DateTime<Utc>, medium: StorageMedium) -> DateTime<Utc> {
    pumped_at + medium.shelf_life()
}

/// Freshness classification of a bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Freshness {
    Fresh,
    /// Less than a day left.
    Soon,
    Expired,
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fresh => "fresh",
            Self::Soon => "soon",
            Self::Expired => "expired",
        })
    }
}

/// Classifies an expiry time relative to `now`.
#[must_use]
pub fn status(expiry_time: DateTime<Utc>, now: DateTime<Utc>) -> Freshness {
    let remaining = expiry_time - now;
    if remaining < TimeDelta::zero() {
        Freshness::Expired
    } else if remaining < TimeDelta::hours(24) {
        Freshness::Soon
    } else {
        Freshness::Fresh
    }
}

/// Human-scale label for the time left before `expiry_time`.
#[must_use]
pub fn time_remaining(expiry_time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = expiry_time - now;
    if remaining < TimeDelta::zero() {
        return "Expired".to_string();
    }

    let hours = remaining.num_hours();
    let days = hours / 24;

    if days > 60 {
        format!("{} months", days / 30)
    } else if days > 0 {
        format!("{days} day{}", plural(days))
    } else if hours > 0 {
        format!("{hours} hour{}", plural(hours))
    } else {
        "< 1 hour".to_string()
    }
}

const fn plural(n: i64) -> &'static str {
    if n > 1 { "s" } else { "" }
}

/// One physical bag of stored milk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkInventoryItem {
    pub id: InventoryItemId,
    pub volume_ml: f64,
    /// When the milk was expressed.
    #[serde(alias = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub pumped_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expiry_time: DateTime<Utc>,
    #[serde(alias = "storage")]
    pub storage_medium: StorageMedium,
    #[serde(default)]
    pub is_consumed: bool,
    /// The pump log that produced this bag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_log_id: Option<LogId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MilkInventoryItem {
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> Freshness {
        status(self.expiry_time, now)
    }

    /// Unconsumed and not yet expired.
    #[must_use]
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        !self.is_consumed && self.status(now) != Freshness::Expired
    }
}

/// Divides a pump session into `bag_count` equal bags.
///
/// `bag_count` must be at least 1; zero yields no bags.
#[must_use]
pub fn split_into_bags(
    total_volume_ml: f64,
    bag_count: u32,
    medium: StorageMedium,
    pumped_at: DateTime<Utc>,
    source_log_id: Option<&LogId>,
) -> Vec<MilkInventoryItem> {
    let volume_per_bag = total_volume_ml / f64::from(bag_count);
    let expiry_time = expiry(pumped_at, medium);

    (0..bag_count)
        .map(|_| MilkInventoryItem {
            id: InventoryItemId::generate(),
            volume_ml: volume_per_bag,
            pumped_at,
            expiry_time,
            storage_medium: medium,
            is_consumed: false,
            source_log_id: source_log_id.cloned(),
            notes: None,
        })
        .collect()
}

/// Totals over the unconsumed part of the stash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InventorySummary {
    pub total_volume_ml: f64,
    pub bags: usize,
    pub expiring_soon: usize,
}

impl InventorySummary {
    pub fn from_items<'a>(
        items: impl IntoIterator<Item = &'a MilkInventoryItem>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut summary = Self {
            total_volume_ml: 0.0,
            bags: 0,
            expiring_soon: 0,
        };
        for item in items.into_iter().filter(|item| !item.is_consumed) {
            summary.total_volume_ml += item.volume_ml;
            summary.bags += 1;
            if item.status(now) == Freshness::Soon {
                summary.expiring_soon += 1;
            }
        }
        summary
    }
}

/// Unconsumed bags, optionally of one medium, soonest expiry first.
pub fn stash_view<'a>(
    items: impl IntoIterator<Item = &'a MilkInventoryItem>,
    medium: Option<StorageMedium>,
) -> Vec<&'a MilkInventoryItem> {
    let mut view: Vec<_> = items
        .into_iter()
        .filter(|item| !item.is_consumed)
        .filter(|item| medium.is_none_or(|m| item.storage_medium == m))
        .collect();
    view.sort_by_key(|item| item.expiry_time);
    view
}
