//! Schedule labels — daily publish times as strict `HH:MM` strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A daily publish time. Only zero-padded 24-hour `HH:MM` strings parse
/// (`00`–`23` hours, `00`–`59` minutes); anything else is rejected as
/// invalid format. Labels order by hour, then minute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleLabel {
    hour: u8,
    minute: u8,
}

impl ScheduleLabel {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl FromStr for ScheduleLabel {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        let digits_ok = b.len() == 5
            && b[2] == b':'
            && [0usize, 1, 3, 4].iter().all(|&i| b[i].is_ascii_digit());
        if !digits_ok {
            return Err(ScheduleError::InvalidFormat);
        }
        let hour = (b[0] - b'0') * 10 + (b[1] - b'0');
        let minute = (b[3] - b'0') * 10 + (b[4] - b'0');
        Self::new(hour, minute).ok_or(ScheduleError::InvalidFormat)
    }
}

impl fmt::Display for ScheduleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for ScheduleLabel {
    type Error = ScheduleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScheduleLabel> for String {
    fn from(label: ScheduleLabel) -> Self {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zero_padded_times() {
        let label: ScheduleLabel = "09:05".parse().unwrap();
        assert_eq!((label.hour(), label.minute()), (9, 5));
        assert_eq!(label.to_string(), "09:05");

        assert!("00:00".parse::<ScheduleLabel>().is_ok());
        assert!("23:59".parse::<ScheduleLabel>().is_ok());
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["9:5", "9:05", "09:5", "24:00", "09:60", "09-05", "0905", "", "ab:cd", "09:05 "] {
            assert_eq!(
                bad.parse::<ScheduleLabel>(),
                Err(ScheduleError::InvalidFormat),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn orders_by_hour_then_minute() {
        let mut labels: Vec<ScheduleLabel> = ["10:00", "09:30", "09:05", "21:15"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        labels.sort();
        let rendered: Vec<String> = labels.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["09:05", "09:30", "10:00", "21:15"]);
    }

    #[test]
    fn serde_round_trips_as_string() {
        let label: ScheduleLabel = "07:40".parse().unwrap();
        let json = serde_json::to_string(&label).unwrap();
        assert_eq!(json, "\"07:40\"");
        let back: ScheduleLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, label);
    }
}
