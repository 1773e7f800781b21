//! In-memory timetable store, keyed by a monotonically-increasing id (§6).
//!
//! A `parking_lot`-guarded in-memory map standing in for a database-backed
//! repository, narrowed to the one entity this crate persists: a solved
//! timetable.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;

use super::error::{StoreError, StoreResult};

/// One proposal's placement in a stored timetable.
#[derive(Debug, Clone)]
pub struct ScheduledEntry {
    pub proposal_id: i64,
    pub start_datetime: Option<DateTime<Utc>>,
}

/// A solved timetable as persisted by the store.
#[derive(Debug, Clone)]
pub struct StoredTimetable {
    pub id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub schedules: Vec<ScheduledEntry>,
}

struct Inner {
    next_id: i64,
    timetables: HashMap<i64, StoredTimetable>,
}

/// Thread-safe in-memory CRUD store for timetables.
#[derive(Clone)]
pub struct TimetableStore {
    inner: Arc<RwLock<Inner>>,
}

impl TimetableStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                next_id: 1,
                timetables: HashMap::new(),
            })),
        }
    }

    pub fn create(&self, start_date: NaiveDate, end_date: NaiveDate, schedules: Vec<ScheduledEntry>) -> StoredTimetable {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;
        let timetable = StoredTimetable {
            id,
            start_date,
            end_date,
            schedules,
        };
        inner.timetables.insert(id, timetable.clone());
        timetable
    }

    pub fn get(&self, id: i64) -> StoreResult<StoredTimetable> {
        self.inner.read().timetables.get(&id).cloned().ok_or_else(|| StoreError::not_found(id))
    }

    pub fn list(&self) -> Vec<StoredTimetable> {
        let mut timetables: Vec<_> = self.inner.read().timetables.values().cloned().collect();
        timetables.sort_by_key(|t| t.id);
        timetables
    }

    pub fn update(
        &self,
        id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        schedules: Vec<ScheduledEntry>,
    ) -> StoreResult<StoredTimetable> {
        let mut inner = self.inner.write();
        let entry = inner.timetables.get_mut(&id).ok_or_else(|| StoreError::not_found(id))?;
        entry.start_date = start_date;
        entry.end_date = end_date;
        entry.schedules = schedules;
        Ok(entry.clone())
    }

    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.timetables.remove(&id).map(|_| ()).ok_or_else(|| StoreError::not_found(id))
    }
}

impl Default for TimetableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<ScheduledEntry> {
        vec![ScheduledEntry { proposal_id: 1, start_datetime: None }]
    }

    #[test]
    fn ids_are_monotonically_increasing() {
        let store = TimetableStore::new();
        let a = store.create(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), sample_entries());
        let b = store.create(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), sample_entries());
        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn get_missing_id_returns_not_found() {
        let store = TimetableStore::new();
        assert!(store.get(99).unwrap_err().is_not_found());
    }

    #[test]
    fn update_then_get_reflects_new_schedules() {
        let store = TimetableStore::new();
        let created = store.create(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), sample_entries());
        store
            .update(created.id, created.start_date, created.end_date, vec![])
            .unwrap();
        assert!(store.get(created.id).unwrap().schedules.is_empty());
    }

    #[test]
    fn delete_removes_entry() {
        let store = TimetableStore::new();
        let created = store.create(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), sample_entries());
        store.delete(created.id).unwrap();
        assert!(store.get(created.id).is_err());
    }

    #[test]
    fn list_is_sorted_by_id() {
        let store = TimetableStore::new();
        store.create(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), sample_entries());
        store.create(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), sample_entries());
        let ids: Vec<_> = store.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![ids[0], ids[0] + 1]);
    }
}
