//! Persisted state: the five slices, snapshots, and the store seam.
//!
//! Storage is an external collaborator. The core hands each changed slice to a
//! [`StateStore`] after every mutation and hydrates from it at session start;
//! how and where the bytes live is up to the implementation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::growth::GrowthLog;
use crate::log::ActivityLog;
use crate::milk::MilkInventoryItem;
use crate::profile::BabyProfile;
use crate::timer::ActiveTimer;
use crate::types::{Owner, UserId, ValidationError};

/// One independently persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slice {
    Logs,
    Growth,
    Timer,
    Profile,
    Inventory,
}

impl Slice {
    pub const ALL: [Self; 5] = [
        Self::Logs,
        Self::Growth,
        Self::Timer,
        Self::Profile,
        Self::Inventory,
    ];

    /// Storage key for the slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Logs => "logs",
            Self::Growth => "growth",
            Self::Timer => "timer",
            Self::Profile => "profile",
            Self::Inventory => "inventory",
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slice {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slice| slice.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "slice",
                value: s.to_string(),
            })
    }
}

/// The current contents of one slice, borrowed for saving.
#[derive(Debug, Clone, Copy)]
pub enum SliceUpdate<'a> {
    Logs(&'a [ActivityLog]),
    Growth(&'a [GrowthLog]),
    /// `None` clears the stored timer.
    Timer(Option<&'a ActiveTimer>),
    Profile(&'a BabyProfile),
    Inventory(&'a [MilkInventoryItem]),
}

impl SliceUpdate<'_> {
    #[must_use]
    pub const fn slice(&self) -> Slice {
        match self {
            Self::Logs(_) => Slice::Logs,
            Self::Growth(_) => Slice::Growth,
            Self::Timer(_) => Slice::Timer,
            Self::Profile(_) => Slice::Profile,
            Self::Inventory(_) => Slice::Inventory,
        }
    }

    /// Serialized payload, or `None` when the stored entry should be removed.
    pub fn to_json(&self) -> Result<Option<String>, serde_json::Error> {
        match self {
            Self::Logs(logs) => serde_json::to_string(logs).map(Some),
            Self::Growth(logs) => serde_json::to_string(logs).map(Some),
            Self::Timer(Some(timer)) => serde_json::to_string(timer).map(Some),
            Self::Timer(None) => Ok(None),
            Self::Profile(profile) => serde_json::to_string(profile).map(Some),
            Self::Inventory(items) => serde_json::to_string(items).map(Some),
        }
    }
}

/// Everything a session needs, as loaded from or written to a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub activity_logs: Vec<ActivityLog>,
    #[serde(default)]
    pub growth_logs: Vec<GrowthLog>,
    #[serde(default)]
    pub active_timer: Option<ActiveTimer>,
    #[serde(default)]
    pub milk_inventory: Vec<MilkInventoryItem>,
    #[serde(default)]
    pub baby_profile: Option<BabyProfile>,
}

/// A slice payload that failed to parse.
#[derive(Debug, Error)]
#[error("invalid {slice} data: {source}")]
pub struct SliceParseError {
    pub slice: Slice,
    #[source]
    pub source: serde_json::Error,
}

impl Snapshot {
    /// Assembles a snapshot from raw slice payloads. Missing slices stay empty.
    pub fn from_slices<'a>(
        slices: impl IntoIterator<Item = (Slice, &'a str)>,
    ) -> Result<Self, SliceParseError> {
        let mut snapshot = Self::default();
        for (slice, json) in slices {
            let wrap = |source| SliceParseError { slice, source };
            match slice {
                Slice::Logs => snapshot.activity_logs = serde_json::from_str(json).map_err(wrap)?,
                Slice::Growth => snapshot.growth_logs = serde_json::from_str(json).map_err(wrap)?,
                Slice::Timer => snapshot.active_timer = serde_json::from_str(json).map_err(wrap)?,
                Slice::Profile => {
                    snapshot.baby_profile = serde_json::from_str(json).map_err(wrap)?;
                }
                Slice::Inventory => {
                    snapshot.milk_inventory = serde_json::from_str(json).map_err(wrap)?;
                }
            }
        }
        Ok(snapshot)
    }

    /// Borrowed updates for every slice that has content to store.
    #[must_use]
    pub fn updates(&self) -> Vec<SliceUpdate<'_>> {
        let mut updates = vec![
            SliceUpdate::Logs(&self.activity_logs),
            SliceUpdate::Growth(&self.growth_logs),
            SliceUpdate::Timer(self.active_timer.as_ref()),
        ];
        if let Some(profile) = &self.baby_profile {
            updates.push(SliceUpdate::Profile(profile));
        }
        updates.push(SliceUpdate::Inventory(&self.milk_inventory));
        updates
    }
}

/// Durable storage for session state, keyed by owner and slice.
pub trait StateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loads everything stored for `owner`. Missing slices come back empty.
    fn load(&self, owner: &Owner) -> Result<Snapshot, Self::Error>;

    /// Replaces one slice for `owner`.
    fn save_slice(&mut self, owner: &Owner, update: SliceUpdate<'_>) -> Result<(), Self::Error>;

    /// Moves anonymous slices under `user`, clearing the anonymous copies.
    ///
    /// Returns how many slices moved.
    fn migrate_anonymous(&mut self, user: &UserId) -> Result<usize, Self::Error>;
}

/// Errors from [`MemoryStore`].
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Parse(#[from] SliceParseError),
    #[error("store is read-only")]
    ReadOnly,
}

/// A [`StateStore`] that keeps slice JSON in a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slices: HashMap<(String, Slice), String>,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write fail, for exercising best-effort persistence.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Stores a raw payload directly.
    pub fn put_raw(&mut self, owner: &Owner, slice: Slice, json: impl Into<String>) {
        self.slices
            .insert((owner.key().to_string(), slice), json.into());
    }

    #[must_use]
    pub fn raw(&self, owner: &Owner, slice: Slice) -> Option<&str> {
        self.slices
            .get(&(owner.key().to_string(), slice))
            .map(String::as_str)
    }
}

impl StateStore for MemoryStore {
    type Error = MemoryStoreError;

    fn load(&self, owner: &Owner) -> Result<Snapshot, Self::Error> {
        let slices = Slice::ALL
            .into_iter()
            .filter_map(|slice| self.raw(owner, slice).map(|json| (slice, json)));
        Ok(Snapshot::from_slices(slices)?)
    }

    fn save_slice(&mut self, owner: &Owner, update: SliceUpdate<'_>) -> Result<(), Self::Error> {
        if self.read_only {
            return Err(MemoryStoreError::ReadOnly);
        }
        let key = (owner.key().to_string(), update.slice());
        match update.to_json()? {
            Some(json) => {
                self.slices.insert(key, json);
            }
            None => {
                self.slices.remove(&key);
            }
        }
        Ok(())
    }

    fn migrate_anonymous(&mut self, user: &UserId) -> Result<usize, Self::Error> {
        if self.read_only {
            return Err(MemoryStoreError::ReadOnly);
        }
        let mut moved = 0;
        for slice in Slice::ALL {
            if let Some(json) = self.slices.remove(&(String::new(), slice)) {
                self.slices.insert((user.as_str().to_string(), slice), json);
                moved += 1;
            }
        }
        Ok(moved)
    }
}
