//! Activity logs: feeds, sleep and pump sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity_kind::ActivityKind;
use crate::milk::StorageMedium;
use crate::types::{InventoryItemId, LogId};

/// One tracked event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: LogId,
    #[serde(alias = "type")]
    pub kind: ActivityKind,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    /// Nursing and sleep only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    /// Bottle and pump only. For a pump log this is the outstanding total
    /// across the bags it still has in the stash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_ml: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_item: Option<String>,
    /// Pump only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bag_count: Option<u32>,
    /// Pump only.
    #[serde(default, alias = "storage", skip_serializing_if = "Option::is_none")]
    pub storage_medium: Option<StorageMedium>,
    /// The stash bag a bottle was filled from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_item_id: Option<InventoryItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ActivityLog {
    /// Creates a bare log with a fresh ID.
    #[must_use]
    pub fn new(kind: ActivityKind, start_time: DateTime<Utc>) -> Self {
        Self {
            id: LogId::generate(),
            kind,
            start_time,
            end_time: None,
            duration_seconds: None,
            amount_ml: None,
            food_item: None,
            bag_count: None,
            storage_medium: None,
            inventory_item_id: None,
            notes: None,
        }
    }

    /// Applies every field present in `patch`.
    pub fn apply(&mut self, patch: &LogPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = Some(end_time);
        }
        if let Some(duration) = patch.duration_seconds {
            self.duration_seconds = Some(duration);
        }
        if let Some(amount) = patch.amount_ml {
            self.amount_ml = Some(amount);
        }
        if let Some(food) = &patch.food_item {
            self.food_item = Some(food.clone());
        }
        if let Some(item) = &patch.inventory_item_id {
            self.inventory_item_id = Some(item.clone());
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
    }
}

/// Partial update of an activity log. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogPatch {
    pub kind: Option<ActivityKind>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<u64>,
    pub amount_ml: Option<f64>,
    pub food_item: Option<String>,
    pub inventory_item_id: Option<InventoryItemId>,
    pub notes: Option<String>,
}

impl LogPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
