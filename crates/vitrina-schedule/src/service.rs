//! Schedule mutation facade.
//!
//! Ties the persisted store to the live triggers. Every successful
//! mutation persists first and rebuilds the full trigger set before it
//! returns, so a caller that sees `Ok` can assume the live triggers match
//! the persisted schedule. Mutations are serialized by a mutex; the
//! persisted record is read-modify-write and concurrent mutations would
//! otherwise lose updates.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::coordinator::CronCoordinator;
use crate::error::ScheduleError;
use crate::label::ScheduleLabel;
use crate::store::ScheduleStore;

pub struct ScheduleService {
    store: ScheduleStore,
    coordinator: Arc<CronCoordinator>,
    mutations: Mutex<()>,
}

impl ScheduleService {
    pub fn new(store: ScheduleStore, coordinator: Arc<CronCoordinator>) -> Self {
        Self {
            store,
            coordinator,
            mutations: Mutex::new(()),
        }
    }

    /// Ensure the record exists and bring the triggers in line with it.
    pub async fn init(&self) -> Result<(), ScheduleError> {
        let _guard = self.mutations.lock().await;
        self.store.init()?;
        let schedule = self.store.schedule()?;
        self.coordinator.init(&schedule);
        Ok(())
    }

    /// Current persisted schedule, sorted.
    pub fn schedule(&self) -> Result<Vec<ScheduleLabel>, ScheduleError> {
        self.store.schedule()
    }

    /// Add a publish time given as raw `HH:MM` input. On success the
    /// trigger set has already been rebuilt.
    pub async fn add(&self, raw: &str) -> Result<Vec<ScheduleLabel>, ScheduleError> {
        let _guard = self.mutations.lock().await;
        let label: ScheduleLabel = raw.parse()?;
        let schedule = self.store.add(label)?;
        self.coordinator.reset(&schedule);
        Ok(schedule)
    }

    /// Remove a publish time given as raw `HH:MM` input. On success the
    /// trigger set has already been rebuilt.
    pub async fn remove(&self, raw: &str) -> Result<Vec<ScheduleLabel>, ScheduleError> {
        let _guard = self.mutations.lock().await;
        let label: ScheduleLabel = raw.parse()?;
        let schedule = self.store.remove(label)?;
        self.coordinator.reset(&schedule);
        Ok(schedule)
    }
}
