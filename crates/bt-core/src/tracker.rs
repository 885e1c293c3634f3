//! The tracking session: every store, the timer and the profile, plus the
//! handle they persist through.
//!
//! Each public mutation finishes in memory first and then writes the slices
//! it touched. Write failures are logged and swallowed so the session keeps
//! working against its in-memory state.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::activity_kind::{ActivityKind, TimerKind};
use crate::entry::NewEntry;
use crate::growth::{GrowthLog, GrowthPatch};
use crate::log::{ActivityLog, LogPatch};
use crate::milk::{InventorySummary, MilkInventoryItem, StorageMedium, split_into_bags};
use crate::profile::BabyProfile;
use crate::reminder;
use crate::state::{Slice, SliceUpdate, Snapshot, StateStore};
use crate::store::{ActivityLogStore, GrowthStore, InventoryStore};
use crate::timer::{ActiveTimer, SessionTimer};
use crate::types::{GrowthLogId, InventoryItemId, LogId, Owner};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("stash bag {0} is already used by another bottle")]
    AlreadyConsumed(InventoryItemId),

    #[error("failed to load saved state")]
    Load(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TrackerError {
    fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;

/// One owner's tracking session.
#[derive(Debug)]
pub struct Tracker<S: StateStore> {
    owner: Owner,
    store: S,
    logs: ActivityLogStore,
    inventory: InventoryStore,
    growth: GrowthStore,
    timer: SessionTimer,
    profile: Option<BabyProfile>,
}

impl<S: StateStore> Tracker<S> {
    /// Loads `owner`'s saved state from `store`.
    pub fn hydrate(store: S, owner: Owner) -> Result<Self> {
        let snapshot = store
            .load(&owner)
            .map_err(|err| TrackerError::Load(Box::new(err)))?;
        debug!(
            %owner,
            logs = snapshot.activity_logs.len(),
            bags = snapshot.milk_inventory.len(),
            "hydrated tracker"
        );
        Ok(Self::from_snapshot(store, owner, snapshot))
    }

    /// Builds a session from already loaded state without touching the store.
    #[must_use]
    pub fn from_snapshot(store: S, owner: Owner, snapshot: Snapshot) -> Self {
        Self {
            owner,
            store,
            logs: ActivityLogStore::new(snapshot.activity_logs),
            inventory: InventoryStore::new(snapshot.milk_inventory),
            growth: GrowthStore::new(snapshot.growth_logs),
            timer: SessionTimer::new(snapshot.active_timer),
            profile: snapshot.baby_profile.map(BabyProfile::with_defaults),
        }
    }

    #[must_use]
    pub const fn owner(&self) -> &Owner {
        &self.owner
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn logs(&self) -> &ActivityLogStore {
        &self.logs
    }

    #[must_use]
    pub const fn inventory(&self) -> &InventoryStore {
        &self.inventory
    }

    #[must_use]
    pub const fn growth(&self) -> &GrowthStore {
        &self.growth
    }

    #[must_use]
    pub const fn active_timer(&self) -> Option<&ActiveTimer> {
        self.timer.active()
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&BabyProfile> {
        self.profile.as_ref()
    }

    /// Current state in its persisted shape.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            activity_logs: self.logs.as_slice().to_vec(),
            growth_logs: self.growth.as_slice().to_vec(),
            active_timer: self.timer.active().copied(),
            milk_inventory: self.inventory.list().to_vec(),
            baby_profile: self.profile.clone(),
        }
    }

    /// When the next feed is due according to the profile's reminder settings.
    #[must_use]
    pub fn next_feed_due(&self) -> Option<DateTime<Utc>> {
        self.profile
            .as_ref()
            .and_then(|profile| reminder::next_due(profile, self.logs.as_slice()))
    }

    #[must_use]
    pub fn inventory_summary(&self, now: DateTime<Utc>) -> InventorySummary {
        InventorySummary::from_items(self.inventory.list(), now)
    }

    pub fn start_timer(&mut self, kind: TimerKind) -> Option<ActivityLog> {
        self.start_timer_at(kind, Utc::now())
    }

    /// Starts a session, finishing any running one first. Returns the
    /// finished log, if there was one.
    pub fn start_timer_at(&mut self, kind: TimerKind, now: DateTime<Utc>) -> Option<ActivityLog> {
        let finished = self.timer.start(kind, now);
        if let Some(log) = &finished {
            debug!(id = %log.id, kind = %log.kind, "finished previous timer");
            self.logs.insert(log.clone());
            self.persist(&[Slice::Logs, Slice::Timer]);
        } else {
            self.persist(&[Slice::Timer]);
        }
        finished
    }

    pub fn stop_timer(&mut self) -> Option<ActivityLog> {
        self.stop_timer_at(Utc::now())
    }

    /// Stops the running session and records it. No-op when idle.
    pub fn stop_timer_at(&mut self, now: DateTime<Utc>) -> Option<ActivityLog> {
        let log = self.timer.stop(now)?;
        self.logs.insert(log.clone());
        self.persist(&[Slice::Logs, Slice::Timer]);
        Some(log)
    }

    /// Records a manual entry.
    ///
    /// A pump entry that tracks inventory also stocks the stash; a bottle
    /// filled from the stash consumes that bag. A bag another bottle already
    /// used is refused.
    pub fn add_entry(&mut self, entry: &NewEntry) -> Result<ActivityLog> {
        let log = entry.to_log();
        if let Some(item) = &log.inventory_item_id {
            self.ensure_unconsumed(item)?;
        }
        let mut touched = vec![Slice::Logs];

        if entry.tracks_inventory() {
            let bags = split_into_bags(
                log.amount_ml.unwrap_or(0.0),
                log.bag_count.unwrap_or(1),
                log.storage_medium.unwrap_or(StorageMedium::Fridge),
                log.start_time,
                Some(&log.id),
            );
            debug!(id = %log.id, bags = bags.len(), "stocked stash from pump");
            self.inventory.add(bags);
            touched.push(Slice::Inventory);
        }

        if let Some(item) = &log.inventory_item_id {
            self.consume(item);
            touched.push(Slice::Inventory);
        }

        self.logs.insert(log.clone());
        self.persist(&touched);
        Ok(log)
    }

    /// Edits a log. A bottle that switches stash bags consumes the new one;
    /// the previous bag stays consumed.
    pub fn update_log(&mut self, id: &LogId, patch: &LogPatch) -> Result<ActivityLog> {
        let previous_item = self
            .logs
            .get(id)
            .ok_or_else(|| TrackerError::not_found("log", id))?
            .inventory_item_id
            .clone();

        let mut touched = vec![Slice::Logs];
        if let Some(item) = &patch.inventory_item_id {
            if previous_item.as_ref() != Some(item) {
                self.ensure_unconsumed(item)?;
            }
            if let Some(previous) = previous_item.as_ref().filter(|previous| *previous != item) {
                warn!(
                    log = %id,
                    %previous,
                    new = %item,
                    "bottle switched stash bags; previous bag stays consumed"
                );
            }
            self.consume(item);
            touched.push(Slice::Inventory);
        }

        let log = self
            .logs
            .get_mut(id)
            .ok_or_else(|| TrackerError::not_found("log", id))?;
        log.apply(patch);
        let updated = log.clone();

        self.persist(&touched);
        Ok(updated)
    }

    /// Deletes a log and unwinds its stash links: a pump log takes all of its
    /// bags with it, a bottle log gives its bag back.
    pub fn delete_log(&mut self, id: &LogId) -> Result<ActivityLog> {
        let log = self
            .logs
            .remove(id)
            .ok_or_else(|| TrackerError::not_found("log", id))?;

        let mut touched = vec![Slice::Logs];
        match (log.kind, &log.inventory_item_id) {
            (ActivityKind::Pump, _) => {
                let removed = self.inventory.remove_by_source(&log.id);
                debug!(id = %log.id, bags = removed.len(), "removed pump bags");
                touched.push(Slice::Inventory);
            }
            (ActivityKind::Bottle, Some(item)) => {
                if self.inventory.set_consumed(item, false) {
                    debug!(id = %log.id, %item, "restored stash bag");
                } else {
                    warn!(id = %log.id, %item, "bottle referenced a missing stash bag");
                }
                touched.push(Slice::Inventory);
            }
            _ => {}
        }

        self.persist(&touched);
        Ok(log)
    }

    /// Removes one stash bag and shrinks the pump log it came from. The pump
    /// log goes away with its last bag.
    pub fn delete_inventory_item(&mut self, id: &InventoryItemId) -> Result<MilkInventoryItem> {
        let item = self
            .inventory
            .remove(id)
            .ok_or_else(|| TrackerError::not_found("stash bag", id))?;

        let mut touched = vec![Slice::Inventory];
        if let Some(source) = &item.source_log_id {
            if let Some(log) = self.logs.get_mut(source) {
                let remaining = log.bag_count.filter(|&count| count > 0).unwrap_or(1) - 1;
                if remaining == 0 {
                    self.logs.remove(source);
                    debug!(%source, "removed pump log with its last bag");
                } else {
                    log.bag_count = Some(remaining);
                    log.amount_ml = Some((log.amount_ml.unwrap_or(0.0) - item.volume_ml).max(0.0));
                    debug!(%source, remaining, "shrank pump log");
                }
                touched.push(Slice::Logs);
            } else {
                debug!(%source, "stash bag's pump log is gone");
            }
        }

        self.persist(&touched);
        Ok(item)
    }

    pub fn add_growth(&mut self, log: GrowthLog) {
        self.growth.create(log);
        self.persist(&[Slice::Growth]);
    }

    pub fn update_growth(&mut self, id: &GrowthLogId, patch: &GrowthPatch) -> Result<()> {
        if !self.growth.update(id, patch) {
            return Err(TrackerError::not_found("measurement", id));
        }
        self.persist(&[Slice::Growth]);
        Ok(())
    }

    pub fn delete_growth(&mut self, id: &GrowthLogId) -> Result<GrowthLog> {
        let log = self
            .growth
            .delete(id)
            .ok_or_else(|| TrackerError::not_found("measurement", id))?;
        self.persist(&[Slice::Growth]);
        Ok(log)
    }

    pub fn set_profile(&mut self, profile: BabyProfile) {
        self.profile = Some(profile.with_defaults());
        self.persist(&[Slice::Profile]);
    }

    /// Bags that don't exist pass; the bottle is recorded with a dangling link.
    fn ensure_unconsumed(&self, item: &InventoryItemId) -> Result<()> {
        match self.inventory.get(item) {
            Some(bag) if bag.is_consumed => Err(TrackerError::AlreadyConsumed(item.clone())),
            _ => Ok(()),
        }
    }

    fn consume(&mut self, item: &InventoryItemId) {
        if self.inventory.set_consumed(item, true) {
            debug!(%item, "consumed stash bag");
        } else {
            warn!(%item, "bottle references a missing stash bag");
        }
    }

    fn persist(&mut self, slices: &[Slice]) {
        for &slice in slices {
            let update = match slice {
                Slice::Logs => SliceUpdate::Logs(self.logs.as_slice()),
                Slice::Growth => SliceUpdate::Growth(self.growth.as_slice()),
                Slice::Timer => SliceUpdate::Timer(self.timer.active()),
                Slice::Inventory => SliceUpdate::Inventory(self.inventory.list()),
                Slice::Profile => match &self.profile {
                    Some(profile) => SliceUpdate::Profile(profile),
                    None => continue,
                },
            };
            if let Err(err) = self.store.save_slice(&self.owner, update) {
                warn!(owner = %self.owner, %slice, error = %err, "failed to save slice");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeDelta, TimeZone};

    use crate::entry::{EntryDetails, Side};
    use crate::milk::Freshness;
    use crate::state::MemoryStore;

    const HOUR: i64 = 3_600_000;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn tracker() -> Tracker<MemoryStore> {
        Tracker::from_snapshot(MemoryStore::new(), Owner::Anonymous, Snapshot::default())
    }

    fn pump(amount_ml: f64, bag_count: u32) -> NewEntry {
        NewEntry {
            start_time: at(0),
            notes: None,
            details: EntryDetails::Pump {
                amount_ml,
                bag_count,
                storage: StorageMedium::Fridge,
                track_inventory: true,
            },
        }
    }

    fn bottle(from_stash: Option<InventoryItemId>) -> NewEntry {
        NewEntry {
            start_time: at(HOUR),
            notes: None,
            details: EntryDetails::Bottle {
                amount_ml: 80.0,
                from_stash,
            },
        }
    }

    fn stored(tracker: &Tracker<MemoryStore>) -> Snapshot {
        tracker.store().load(&Owner::Anonymous).unwrap()
    }

    #[test]
    fn starting_a_timer_finishes_the_running_one() {
        let mut tracker = tracker();
        assert!(tracker.start_timer_at(TimerKind::NursingLeft, at(0)).is_none());

        let finished = tracker
            .start_timer_at(TimerKind::NursingRight, at(10 * 60_000))
            .unwrap();
        assert_eq!(finished.kind, ActivityKind::NursingLeft);
        assert_eq!(finished.duration_seconds, Some(600));
        assert_eq!(tracker.logs().len(), 1);
        assert_eq!(tracker.active_timer().unwrap().kind, TimerKind::NursingRight);

        let saved = stored(&tracker);
        assert_eq!(saved.activity_logs.len(), 1);
        assert_eq!(saved.active_timer.unwrap().start_time, at(10 * 60_000));
    }

    #[test]
    fn stopping_clears_the_stored_timer() {
        let mut tracker = tracker();
        tracker.start_timer_at(TimerKind::Sleep, at(0));
        let log = tracker.stop_timer_at(at(HOUR)).unwrap();
        assert_eq!(log.duration_seconds, Some(3600));
        assert!(tracker.stop_timer_at(at(2 * HOUR)).is_none());

        assert!(tracker.store().raw(&Owner::Anonymous, Slice::Timer).is_none());
        assert_eq!(stored(&tracker).activity_logs, vec![log]);
    }

    #[test]
    fn pump_splits_into_bags_sharing_expiry() {
        let mut tracker = tracker();
        let log = tracker.add_entry(&pump(240.0, 3)).unwrap();

        let bags = tracker.inventory().list();
        assert_eq!(bags.len(), 3);
        assert!(bags.iter().all(|bag| bag.volume_ml == 80.0));
        assert!(bags.iter().all(|bag| bag.expiry_time == bags[0].expiry_time));
        assert!(bags.iter().all(|bag| bag.source_log_id.as_ref() == Some(&log.id)));
        assert_eq!(bags[0].expiry_time, at(96 * HOUR));
        assert_eq!(stored(&tracker).milk_inventory.len(), 3);
    }

    #[test]
    fn untracked_pump_leaves_stash_alone() {
        let mut tracker = tracker();
        let entry = NewEntry {
            details: EntryDetails::Pump {
                amount_ml: 100.0,
                bag_count: 2,
                storage: StorageMedium::Room,
                track_inventory: false,
            },
            ..pump(0.0, 1)
        };
        tracker.add_entry(&entry).unwrap();
        assert!(tracker.inventory().list().is_empty());
        assert_eq!(tracker.logs().len(), 1);
    }

    #[test]
    fn deleting_pump_removes_all_its_bags() {
        let mut tracker = tracker();
        let log = tracker.add_entry(&pump(240.0, 3)).unwrap();
        let first = tracker.inventory().list()[0].id.clone();
        tracker.add_entry(&bottle(Some(first))).unwrap();

        tracker.delete_log(&log.id).unwrap();
        assert!(tracker.inventory().list().is_empty());
        assert!(stored(&tracker).milk_inventory.is_empty());
    }

    #[test]
    fn deleting_bags_shrinks_then_removes_pump_log() {
        let mut tracker = tracker();
        let log = tracker.add_entry(&pump(240.0, 3)).unwrap();
        let ids: Vec<_> = tracker
            .inventory()
            .list()
            .iter()
            .map(|bag| bag.id.clone())
            .collect();

        tracker.delete_inventory_item(&ids[0]).unwrap();
        let shrunk = tracker.logs().get(&log.id).unwrap();
        assert_eq!(shrunk.amount_ml, Some(160.0));
        assert_eq!(shrunk.bag_count, Some(2));

        tracker.delete_inventory_item(&ids[1]).unwrap();
        assert!(tracker.logs().get(&log.id).is_some());
        tracker.delete_inventory_item(&ids[2]).unwrap();
        assert!(tracker.logs().get(&log.id).is_none());
        assert!(stored(&tracker).activity_logs.is_empty());
    }

    #[test]
    fn deleting_unlinked_bag_is_plain_removal() {
        let mut tracker = tracker();
        let log = tracker.add_entry(&pump(240.0, 3)).unwrap();
        let id = tracker.inventory().list()[0].id.clone();
        tracker.logs.remove(&log.id);

        tracker.delete_inventory_item(&id).unwrap();
        assert_eq!(tracker.inventory().list().len(), 2);
    }

    #[test]
    fn bottle_consumes_and_deletion_restores() {
        let mut tracker = tracker();
        tracker.add_entry(&pump(120.0, 1)).unwrap();
        let bag = tracker.inventory().list()[0].id.clone();

        let feed = tracker.add_entry(&bottle(Some(bag.clone()))).unwrap();
        assert!(tracker.inventory().get(&bag).unwrap().is_consumed);
        assert!(tracker.inventory().available(at(HOUR)).is_empty());

        tracker.delete_log(&feed.id).unwrap();
        let restored = tracker.inventory().get(&bag).unwrap();
        assert!(!restored.is_consumed);
        assert_eq!(restored.status(at(HOUR)), Freshness::Fresh);
        assert!(!stored(&tracker).milk_inventory[0].is_consumed);
    }

    #[test]
    fn switching_bottle_bag_keeps_old_bag_consumed() {
        let mut tracker = tracker();
        tracker.add_entry(&pump(160.0, 2)).unwrap();
        let first = tracker.inventory().list()[0].id.clone();
        let second = tracker.inventory().list()[1].id.clone();
        let feed = tracker.add_entry(&bottle(Some(first.clone()))).unwrap();

        let patch = LogPatch {
            inventory_item_id: Some(second.clone()),
            ..LogPatch::default()
        };
        let updated = tracker.update_log(&feed.id, &patch).unwrap();
        assert_eq!(updated.inventory_item_id, Some(second.clone()));
        assert!(tracker.inventory().get(&first).unwrap().is_consumed);
        assert!(tracker.inventory().get(&second).unwrap().is_consumed);
    }

    #[test]
    fn second_bottle_on_the_same_bag_is_refused() {
        let mut tracker = tracker();
        tracker.add_entry(&pump(120.0, 1)).unwrap();
        let bag = tracker.inventory().list()[0].id.clone();
        let first = tracker.add_entry(&bottle(Some(bag.clone()))).unwrap();

        let err = tracker.add_entry(&bottle(Some(bag.clone()))).unwrap_err();
        assert!(matches!(err, TrackerError::AlreadyConsumed(ref id) if *id == bag));
        assert_eq!(tracker.logs().len(), 2);
        let referencing = tracker
            .logs()
            .as_slice()
            .iter()
            .filter(|log| log.inventory_item_id.as_ref() == Some(&bag))
            .count();
        assert_eq!(referencing, 1);

        // Once the first bottle is gone the bag is free again.
        tracker.delete_log(&first.id).unwrap();
        assert!(!tracker.inventory().get(&bag).unwrap().is_consumed);
        tracker.add_entry(&bottle(Some(bag.clone()))).unwrap();
        assert!(tracker.inventory().get(&bag).unwrap().is_consumed);
    }

    #[test]
    fn editing_onto_a_used_bag_is_refused() {
        let mut tracker = tracker();
        tracker.add_entry(&pump(160.0, 2)).unwrap();
        let first = tracker.inventory().list()[0].id.clone();
        let second = tracker.inventory().list()[1].id.clone();
        tracker.add_entry(&bottle(Some(first.clone()))).unwrap();
        let other = tracker.add_entry(&bottle(Some(second.clone()))).unwrap();

        let onto_first = LogPatch {
            inventory_item_id: Some(first.clone()),
            ..LogPatch::default()
        };
        let err = tracker.update_log(&other.id, &onto_first).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("stash bag {first} is already used by another bottle")
        );
        let unchanged = tracker.logs().get(&other.id).unwrap();
        assert_eq!(unchanged.inventory_item_id, Some(second.clone()));

        // Re-saving the bag a bottle already holds is not a conflict.
        let same = LogPatch {
            inventory_item_id: Some(second.clone()),
            ..LogPatch::default()
        };
        tracker.update_log(&other.id, &same).unwrap();
    }

    #[test]
    fn bottle_with_unknown_bag_is_still_recorded() {
        let mut tracker = tracker();
        let missing = InventoryItemId::new("gone").unwrap();
        let feed = tracker.add_entry(&bottle(Some(missing))).unwrap();
        assert!(tracker.logs().get(&feed.id).is_some());
        assert!(tracker.inventory().list().is_empty());
    }

    #[test]
    fn missing_ids_are_reported() {
        let mut tracker = tracker();
        let err = tracker
            .delete_log(&LogId::new("nope").unwrap())
            .unwrap_err();
        assert_eq!(err.to_string(), "log not found: nope");
        assert!(
            tracker
                .update_log(&LogId::new("nope").unwrap(), &LogPatch::default())
                .is_err()
        );
        assert!(
            tracker
                .delete_inventory_item(&InventoryItemId::new("nope").unwrap())
                .is_err()
        );
        assert!(
            tracker
                .delete_growth(&GrowthLogId::new("nope").unwrap())
                .is_err()
        );
    }

    #[test]
    fn growth_changes_are_persisted() {
        let mut tracker = tracker();
        let log = GrowthLog::new(at(0), Some(3.4), None);
        let id = log.id.clone();
        tracker.add_growth(log);
        tracker
            .update_growth(
                &id,
                &GrowthPatch {
                    weight_kg: Some(3.6),
                    ..GrowthPatch::default()
                },
            )
            .unwrap();
        assert_eq!(stored(&tracker).growth_logs[0].weight_kg, Some(3.6));

        tracker.delete_growth(&id).unwrap();
        assert!(stored(&tracker).growth_logs.is_empty());
    }

    #[test]
    fn hydration_without_mutation_reproduces_stored_bytes() {
        let logs = r#"[{"id":"b","kind":"bottle","startTime":7200000,"amountMl":80.0,"inventoryItemId":"i1"},{"id":"a","kind":"pump","startTime":0,"amountMl":80.0,"bagCount":1,"storageMedium":"FRIDGE"}]"#;
        let inventory = r#"[{"id":"i1","volumeMl":80.0,"pumpedAt":0,"expiryTime":345600000,"storageMedium":"FRIDGE","isConsumed":true,"sourceLogId":"a"}]"#;
        let timer = r#"{"kind":"sleep","startTime":9000000}"#;
        let growth = r#"[{"id":"g","date":0,"weightKg":3.5}]"#;

        let mut store = MemoryStore::new();
        let owner = Owner::Anonymous;
        store.put_raw(&owner, Slice::Logs, logs);
        store.put_raw(&owner, Slice::Inventory, inventory);
        store.put_raw(&owner, Slice::Timer, timer);
        store.put_raw(&owner, Slice::Growth, growth);

        let tracker = Tracker::hydrate(store, owner).unwrap();
        let snapshot = tracker.snapshot();
        let written: Vec<_> = snapshot
            .updates()
            .iter()
            .map(|update| update.to_json().unwrap())
            .collect();
        assert_eq!(
            written,
            vec![
                Some(logs.to_string()),
                Some(growth.to_string()),
                Some(timer.to_string()),
                Some(inventory.to_string()),
            ]
        );
    }

    #[test]
    fn profile_is_defaulted_and_drives_next_feed() {
        let mut store = MemoryStore::new();
        store.put_raw(
            &Owner::Anonymous,
            Slice::Profile,
            r#"{"name":"Ada","remindersEnabled":true,"reminderIntervalMinutes":0}"#,
        );
        let mut tracker = Tracker::hydrate(store, Owner::Anonymous).unwrap();
        assert_eq!(tracker.profile().unwrap().reminder_interval_minutes, 180);

        tracker.add_entry(&NewEntry {
            start_time: at(0),
            notes: None,
            details: EntryDetails::Nursing {
                side: Side::Left,
                minutes: 15,
            },
        })
        .unwrap();
        assert_eq!(tracker.next_feed_due(), Some(at(3 * HOUR)));

        tracker.set_profile(BabyProfile::new("Ada"));
        assert_eq!(tracker.next_feed_due(), None);
        assert!(stored(&tracker).baby_profile.is_some());
    }

    #[test]
    fn store_failures_do_not_undo_mutations() {
        let mut tracker = Tracker::from_snapshot(
            MemoryStore::new().read_only(),
            Owner::Anonymous,
            Snapshot::default(),
        );
        tracker.add_entry(&pump(100.0, 2)).unwrap();
        assert_eq!(tracker.logs().len(), 1);
        assert_eq!(tracker.inventory().list().len(), 2);
        assert!(stored(&tracker).activity_logs.is_empty());
    }

    #[test]
    fn summary_counts_soon_expiring_bags() {
        let mut tracker = tracker();
        tracker.add_entry(&pump(240.0, 3)).unwrap();
        let now = at(96 * HOUR) - TimeDelta::hours(2);
        let summary = tracker.inventory_summary(now);
        assert_eq!(summary.bags, 3);
        assert_eq!(summary.expiring_soon, 3);
        assert!((summary.total_volume_ml - 240.0).abs() < 1e-9);
    }
}
