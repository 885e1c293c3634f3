//! Core domain logic for the baby tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Activity logs: feeds, sleep and pump sessions, and the live timer
//! - Milk stash: shelf life, freshness, and the pump/bottle cascades
//! - Reminders: when the next feed is due
//! - Persistence seam: the slices a [`StateStore`] saves and loads

pub mod activity_kind;
pub mod digest;
pub mod entry;
pub mod growth;
pub mod log;
pub mod milk;
pub mod profile;
pub mod reminder;
pub mod state;
pub mod store;
pub mod timer;
mod tracker;
pub mod types;
pub mod units;

pub use activity_kind::{ActivityKind, TimerKind, UnknownActivityKind};
pub use entry::{EntryDetails, EntryError, FormSubmission, NewEntry, Side};
pub use growth::{GrowthLog, GrowthPatch};
pub use log::{ActivityLog, LogPatch};
pub use milk::{Freshness, InventorySummary, MilkInventoryItem, StorageMedium};
pub use profile::BabyProfile;
pub use state::{Slice, SliceUpdate, Snapshot, StateStore};
pub use timer::ActiveTimer;
pub use tracker::{Tracker, TrackerError};
pub use types::{GrowthLogId, InventoryItemId, LogId, Owner, UserId, ValidationError};
pub use units::{HeightUnit, VolumeUnit, WeightUnit};
