//! Live cron triggers.
//!
//! The coordinator owns a registry of trigger handles, one per schedule
//! label. A trigger is a tokio task that repeatedly sleeps until its
//! label's next occurrence and then runs the fire action. Rebuilds are a
//! full replacement: every live trigger is stopped and a fresh one is
//! spawned per label, even for labels that did not change.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use chrono_tz::Tz;
use tokio::task::JoinHandle;

use crate::cron;
use crate::label::ScheduleLabel;

type FireFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type FireAction = Arc<dyn Fn() -> FireFuture + Send + Sync>;

/// Registry of live triggers, keyed by label.
pub struct CronCoordinator {
    tz: Tz,
    action: FireAction,
    triggers: Mutex<BTreeMap<ScheduleLabel, JoinHandle<()>>>,
}

impl CronCoordinator {
    /// Create a coordinator with no live triggers. `action` runs at every
    /// firing of every trigger.
    pub fn new<F, Fut>(tz: Tz, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            tz,
            action: Arc::new(move || Box::pin(action())),
            triggers: Mutex::new(BTreeMap::new()),
        }
    }

    /// Build one trigger per label.
    pub fn init(&self, schedule: &[ScheduleLabel]) {
        self.reset(schedule);
        tracing::info!("Cron initialized: {}", render(schedule));
    }

    /// Stop every live trigger, then build one fresh trigger per label.
    pub fn reset(&self, schedule: &[ScheduleLabel]) {
        let mut triggers = self
            .triggers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        for handle in triggers.values() {
            handle.abort();
        }
        triggers.clear();
        for label in schedule {
            triggers.insert(*label, self.spawn_trigger(*label));
        }
        tracing::info!("Cron reset: {}", render(schedule));
    }

    /// Number of live triggers.
    pub fn trigger_count(&self) -> usize {
        self.triggers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Labels with a live trigger, in firing order within a day.
    pub fn labels(&self) -> Vec<ScheduleLabel> {
        self.triggers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .copied()
            .collect()
    }

    fn spawn_trigger(&self, label: ScheduleLabel) -> JoinHandle<()> {
        let tz = self.tz;
        let action = Arc::clone(&self.action);
        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let next = cron::next_occurrence(label.hour(), label.minute(), tz, now);
                let wait = (next - now).to_std().unwrap_or_default();
                tracing::debug!("Trigger {label} sleeping until {next}");
                tokio::time::sleep(wait).await;
                tracing::info!("Trigger {label} fired");
                action().await;
            }
        })
    }
}

impl Drop for CronCoordinator {
    fn drop(&mut self) {
        let triggers = self.triggers.lock().unwrap_or_else(|e| e.into_inner());
        for handle in triggers.values() {
            handle.abort();
        }
    }
}

fn render(schedule: &[ScheduleLabel]) -> String {
    let labels: Vec<String> = schedule.iter().map(ToString::to_string).collect();
    format!("[{}]", labels.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<ScheduleLabel> {
        raw.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn noop_coordinator() -> CronCoordinator {
        CronCoordinator::new(chrono_tz::Europe::Kiev, || async {})
    }

    #[tokio::test]
    async fn init_spawns_one_trigger_per_label() {
        let coordinator = noop_coordinator();
        coordinator.init(&labels(&["09:05", "18:00"]));
        assert_eq!(coordinator.trigger_count(), 2);
        assert_eq!(coordinator.labels(), labels(&["09:05", "18:00"]));
    }

    #[tokio::test]
    async fn reset_replaces_the_whole_trigger_set() {
        let coordinator = noop_coordinator();
        coordinator.init(&labels(&["09:05", "18:00"]));

        coordinator.reset(&labels(&["12:30"]));
        assert_eq!(coordinator.trigger_count(), 1);
        assert_eq!(coordinator.labels(), labels(&["12:30"]));

        coordinator.reset(&[]);
        assert_eq!(coordinator.trigger_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_fires_the_action() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let coordinator = CronCoordinator::new(chrono_tz::Europe::Kiev, move || {
            let tx = tx.clone();
            async move {
                tx.send(()).ok();
            }
        });
        coordinator.init(&labels(&["12:00"]));

        // Paused tokio time auto-advances through the sleep-until-next
        // wait, so the trigger fires without waiting a real day.
        let deadline = tokio::time::Duration::from_secs(60 * 60 * 48);
        tokio::time::timeout(deadline, rx.recv())
            .await
            .expect("trigger should have fired under paused time")
            .expect("fire action should have reported");
    }
}
