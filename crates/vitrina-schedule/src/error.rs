//! Schedule errors.
//!
//! Rejections carry a short operator-facing message; the interface layer
//! relays them verbatim. None of them change persisted state.

use thiserror::Error;

use crate::label::ScheduleLabel;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("invalid time format, expected HH:MM (e.g. 09:05)")]
    InvalidFormat,

    #[error("time {0} is already in the schedule")]
    Duplicate(ScheduleLabel),

    #[error("time {0} is not in the schedule")]
    NotFound(ScheduleLabel),

    #[error("schedule storage error: {0}")]
    Storage(String),
}
