//! Persisted publish-time schedule.
//!
//! The schedule lives in one small JSON record, read fully and rewritten
//! fully on every mutation. The store is the only writer; the sorted,
//! duplicate-free order is re-established on every mutation, not just on
//! load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::label::ScheduleLabel;

/// The persisted record shape: `{"schedule": ["09:05", ...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ScheduleData {
    schedule: Vec<ScheduleLabel>,
}

/// File-backed schedule store.
pub struct ScheduleStore {
    path: PathBuf,
}

impl ScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the record exists, creating an empty schedule if absent.
    /// Idempotent.
    pub fn init(&self) -> Result<(), ScheduleError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ScheduleError::Storage(format!("create {}: {e}", parent.display())))?;
        }
        self.persist(&ScheduleData::default())
    }

    /// Current schedule, sorted ascending by hour then minute.
    pub fn schedule(&self) -> Result<Vec<ScheduleLabel>, ScheduleError> {
        Ok(self.load()?.schedule)
    }

    /// Insert a label. Rejects duplicates; persists and returns the new
    /// schedule otherwise.
    pub fn add(&self, label: ScheduleLabel) -> Result<Vec<ScheduleLabel>, ScheduleError> {
        let mut data = self.load()?;
        if data.schedule.contains(&label) {
            return Err(ScheduleError::Duplicate(label));
        }
        data.schedule.push(label);
        data.schedule.sort();
        self.persist(&data)?;
        Ok(data.schedule)
    }

    /// Remove a label. Rejects when absent; persists and returns the new
    /// schedule otherwise.
    pub fn remove(&self, label: ScheduleLabel) -> Result<Vec<ScheduleLabel>, ScheduleError> {
        let mut data = self.load()?;
        let before = data.schedule.len();
        data.schedule.retain(|l| *l != label);
        if data.schedule.len() == before {
            return Err(ScheduleError::NotFound(label));
        }
        self.persist(&data)?;
        Ok(data.schedule)
    }

    fn load(&self) -> Result<ScheduleData, ScheduleError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ScheduleError::Storage(format!("read {}: {e}", self.path.display())))?;
        let mut data: ScheduleData = serde_json::from_str(&content)
            .map_err(|e| ScheduleError::Storage(format!("parse {}: {e}", self.path.display())))?;
        data.schedule.sort();
        data.schedule.dedup();
        Ok(data)
    }

    /// Write the full record, via a temp file swapped into place.
    fn persist(&self, data: &ScheduleData) -> Result<(), ScheduleError> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| ScheduleError::Storage(format!("serialize schedule: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)
            .map_err(|e| ScheduleError::Storage(format!("write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| ScheduleError::Storage(format!("replace {}: {e}", self.path.display())))?;
        tracing::debug!("Saved {} schedule entries", data.schedule.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> ScheduleLabel {
        s.parse().unwrap()
    }

    fn test_store(name: &str) -> ScheduleStore {
        let dir = std::env::temp_dir().join("vitrina-test-schedule").join(name);
        std::fs::remove_dir_all(&dir).ok();
        ScheduleStore::new(dir.join("schedule.json"))
    }

    #[test]
    fn init_creates_empty_record_once() {
        let store = test_store("init");
        store.init().unwrap();
        assert!(store.schedule().unwrap().is_empty());

        // Second init leaves existing content alone.
        store.add(label("10:00")).unwrap();
        store.init().unwrap();
        assert_eq!(store.schedule().unwrap(), vec![label("10:00")]);
    }

    #[test]
    fn add_keeps_schedule_sorted() {
        let store = test_store("sorted");
        store.init().unwrap();
        store.add(label("10:00")).unwrap();
        store.add(label("09:30")).unwrap();
        let schedule = store.add(label("09:05")).unwrap();
        assert_eq!(schedule, vec![label("09:05"), label("09:30"), label("10:00")]);
        // And the persisted copy reads back in the same order.
        assert_eq!(store.schedule().unwrap(), schedule);
    }

    #[test]
    fn duplicate_add_is_rejected_without_change() {
        let store = test_store("dup");
        store.init().unwrap();
        store.add(label("09:05")).unwrap();
        assert_eq!(
            store.add(label("09:05")),
            Err(ScheduleError::Duplicate(label("09:05")))
        );
        assert_eq!(store.schedule().unwrap().len(), 1);
    }

    #[test]
    fn remove_missing_label_is_rejected_without_change() {
        let store = test_store("missing");
        store.init().unwrap();
        store.add(label("09:05")).unwrap();
        assert_eq!(
            store.remove(label("18:00")),
            Err(ScheduleError::NotFound(label("18:00")))
        );
        assert_eq!(store.schedule().unwrap(), vec![label("09:05")]);
    }

    #[test]
    fn remove_persists_the_shrunken_schedule() {
        let store = test_store("remove");
        store.init().unwrap();
        store.add(label("09:05")).unwrap();
        store.add(label("18:00")).unwrap();
        let schedule = store.remove(label("09:05")).unwrap();
        assert_eq!(schedule, vec![label("18:00")]);

        // A fresh store instance sees the same state.
        let reopened = ScheduleStore::new(store.path().to_path_buf());
        assert_eq!(reopened.schedule().unwrap(), vec![label("18:00")]);
    }
}
