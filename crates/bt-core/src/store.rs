//! In-memory collections for logs, stash bags and growth measurements.
//!
//! These stores only know about their own records. Cross-entity cascades
//! (pump ↔ stash ↔ bottle) are composed by [`crate::Tracker`].
//!
//! Each store keeps records in stored order (newest insert first for logs and
//! growth, append order for the stash) so that loading and saving without
//! mutations reproduces the stored data exactly. Sorted views are computed on
//! demand.

use chrono::{DateTime, Utc};

use crate::growth::{GrowthLog, GrowthPatch};
use crate::log::ActivityLog;
use crate::milk::MilkInventoryItem;
use crate::types::{GrowthLogId, InventoryItemId, LogId};

/// Feeding, sleep and pump logs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityLogStore {
    logs: Vec<ActivityLog>,
}

impl ActivityLogStore {
    #[must_use]
    pub const fn new(logs: Vec<ActivityLog>) -> Self {
        Self { logs }
    }

    /// Records in stored order.
    #[must_use]
    pub fn as_slice(&self) -> &[ActivityLog] {
        &self.logs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Newest first by start time. Equal start times keep stored order.
    #[must_use]
    pub fn list(&self) -> Vec<&ActivityLog> {
        let mut sorted: Vec<_> = self.logs.iter().collect();
        sorted.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        sorted
    }

    /// Prepends a log.
    pub fn insert(&mut self, log: ActivityLog) {
        self.logs.insert(0, log);
    }

    #[must_use]
    pub fn get(&self, id: &LogId) -> Option<&ActivityLog> {
        self.logs.iter().find(|log| &log.id == id)
    }

    pub fn get_mut(&mut self, id: &LogId) -> Option<&mut ActivityLog> {
        self.logs.iter_mut().find(|log| &log.id == id)
    }

    pub fn remove(&mut self, id: &LogId) -> Option<ActivityLog> {
        let index = self.logs.iter().position(|log| &log.id == id)?;
        Some(self.logs.remove(index))
    }

    /// The most recent log that counts toward the feeding cadence.
    #[must_use]
    pub fn latest_feed(&self) -> Option<&ActivityLog> {
        self.logs
            .iter()
            .filter(|log| log.kind.is_feed())
            .max_by_key(|log| log.start_time)
    }
}

/// Stored milk bags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryStore {
    items: Vec<MilkInventoryItem>,
}

impl InventoryStore {
    #[must_use]
    pub const fn new(items: Vec<MilkInventoryItem>) -> Self {
        Self { items }
    }

    /// Records in stored order.
    #[must_use]
    pub fn list(&self) -> &[MilkInventoryItem] {
        &self.items
    }

    pub fn add(&mut self, items: impl IntoIterator<Item = MilkInventoryItem>) {
        self.items.extend(items);
    }

    #[must_use]
    pub fn get(&self, id: &InventoryItemId) -> Option<&MilkInventoryItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn remove(&mut self, id: &InventoryItemId) -> Option<MilkInventoryItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Removes every bag produced by `log_id`, consumed or not.
    pub fn remove_by_source(&mut self, log_id: &LogId) -> Vec<MilkInventoryItem> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.source_log_id.as_ref() == Some(log_id));
        self.items = kept;
        removed
    }

    /// Sets the consumed flag. Returns `false` if no such bag exists.
    pub fn set_consumed(&mut self, id: &InventoryItemId, consumed: bool) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.is_consumed = consumed;
                true
            }
            None => false,
        }
    }

    /// Bags a new bottle may be filled from.
    #[must_use]
    pub fn available(&self, now: DateTime<Utc>) -> Vec<&MilkInventoryItem> {
        self.items
            .iter()
            .filter(|item| item.is_available(now))
            .collect()
    }
}

/// Growth measurements. No links to anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthStore {
    logs: Vec<GrowthLog>,
}

impl GrowthStore {
    #[must_use]
    pub const fn new(logs: Vec<GrowthLog>) -> Self {
        Self { logs }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[GrowthLog] {
        &self.logs
    }

    /// Newest measurement first.
    #[must_use]
    pub fn list(&self) -> Vec<&GrowthLog> {
        let mut sorted: Vec<_> = self.logs.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    pub fn create(&mut self, log: GrowthLog) {
        self.logs.insert(0, log);
    }

    /// Returns `false` if no such measurement exists.
    pub fn update(&mut self, id: &GrowthLogId, patch: &GrowthPatch) -> bool {
        match self.logs.iter_mut().find(|log| &log.id == id) {
            Some(log) => {
                log.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: &GrowthLogId) -> Option<GrowthLog> {
        let index = self.logs.iter().position(|log| &log.id == id)?;
        Some(self.logs.remove(index))
    }

    /// Most recent measurement.
    #[must_use]
    pub fn latest(&self) -> Option<&GrowthLog> {
        self.logs.iter().max_by_key(|log| log.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use crate::activity_kind::ActivityKind;
    use crate::milk::{StorageMedium, split_into_bags};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn list_sorts_newest_first_without_reordering_storage() {
        let mut store = ActivityLogStore::default();
        let older = ActivityLog::new(ActivityKind::Bottle, at(1_000));
        let newer = ActivityLog::new(ActivityKind::Sleep, at(5_000));
        store.insert(newer.clone());
        // Backdated manual entry lands at the front of storage.
        store.insert(older.clone());

        assert_eq!(store.as_slice()[0].id, older.id);
        let listed: Vec<_> = store.list().into_iter().map(|log| &log.id).collect();
        assert_eq!(listed, vec![&newer.id, &older.id]);
    }

    #[test]
    fn latest_feed_skips_non_feeds() {
        let mut store = ActivityLogStore::default();
        let feed = ActivityLog::new(ActivityKind::NursingRight, at(1_000));
        store.insert(feed.clone());
        store.insert(ActivityLog::new(ActivityKind::Pump, at(2_000)));
        store.insert(ActivityLog::new(ActivityKind::Sleep, at(3_000)));
        store.insert(ActivityLog::new(ActivityKind::Solids, at(4_000)));

        assert_eq!(store.latest_feed().map(|log| &log.id), Some(&feed.id));
    }

    #[test]
    fn remove_by_source_takes_consumed_bags_too() {
        let source = LogId::new("pump-1").unwrap();
        let mut store = InventoryStore::default();
        store.add(split_into_bags(
            90.0,
            3,
            StorageMedium::Fridge,
            at(0),
            Some(&source),
        ));
        store.add(split_into_bags(50.0, 1, StorageMedium::Room, at(0), None));
        let first = store.list()[0].id.clone();
        assert!(store.set_consumed(&first, true));

        let removed = store.remove_by_source(&source);
        assert_eq!(removed.len(), 3);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn set_consumed_reports_missing_bag() {
        let mut store = InventoryStore::default();
        let missing = InventoryItemId::new("nope").unwrap();
        assert!(!store.set_consumed(&missing, true));
    }

    #[test]
    fn growth_crud() {
        let mut store = GrowthStore::default();
        let first = GrowthLog::new(at(0), Some(3.5), None);
        let second = GrowthLog::new(at(86_400_000), Some(3.7), Some(52.0));
        store.create(second.clone());
        store.create(first.clone());

        assert_eq!(store.list()[0].id, second.id);
        assert_eq!(store.latest().map(|log| &log.id), Some(&second.id));

        assert!(store.update(
            &first.id,
            &GrowthPatch {
                height_cm: Some(50.0),
                ..GrowthPatch::default()
            }
        ));
        assert_eq!(store.list()[1].height_cm, Some(50.0));

        assert!(store.delete(&first.id).is_some());
        assert!(store.delete(&first.id).is_none());
        assert_eq!(store.as_slice().len(), 1);
    }
}
