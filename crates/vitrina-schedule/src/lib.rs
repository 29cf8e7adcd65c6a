//! # Vitrina Schedule
//!
//! The publish-time schedule and its live triggers.
//!
//! A schedule is a sorted, duplicate-free list of daily `HH:MM` labels,
//! persisted as a small JSON record. Each label owns exactly one live
//! trigger: a tokio task that sleeps until the label's next wall-clock
//! occurrence in the configured timezone and then fires the publish
//! action. Every schedule mutation persists first, then replaces the
//! whole trigger set before reporting success, so the live triggers
//! always match the persisted schedule.
//!
//! ```text
//! ScheduleService::add("09:05")
//!   ├── ScheduleStore: validate → insert → sort → persist
//!   └── CronCoordinator::reset — abort all triggers, spawn one per label
//! ```

pub mod coordinator;
pub mod cron;
pub mod error;
pub mod label;
pub mod service;
pub mod store;

pub use coordinator::CronCoordinator;
pub use error::ScheduleError;
pub use label::ScheduleLabel;
pub use service::ScheduleService;
pub use store::ScheduleStore;
