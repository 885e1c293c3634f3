//! Growth measurements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::GrowthLogId;

/// A point-in-time weight and/or height measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthLog {
    pub id: GrowthLogId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GrowthLog {
    #[must_use]
    pub fn new(date: DateTime<Utc>, weight_kg: Option<f64>, height_cm: Option<f64>) -> Self {
        Self {
            id: GrowthLogId::generate(),
            date,
            weight_kg,
            height_cm,
            notes: None,
        }
    }
}

/// Partial update of a growth measurement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthPatch {
    pub date: Option<DateTime<Utc>>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub notes: Option<String>,
}

impl GrowthLog {
    pub fn apply(&mut self, patch: &GrowthPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(weight) = patch.weight_kg {
            self.weight_kg = Some(weight);
        }
        if let Some(height) = patch.height_cm {
            self.height_cm = Some(height);
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
    }
}
