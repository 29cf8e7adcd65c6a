//! Next-occurrence computation for daily publish times.
//!
//! Publish times are wall-clock times in one fixed, configured timezone,
//! never the host's local zone. DST edges are handled per day: a time
//! that does not exist on a given day (spring-forward gap) rolls to the
//! next day, an ambiguous time (fall-back) resolves to the earlier
//! instant.

use chrono::{DateTime, Datelike, Duration, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;

/// Next wall-clock occurrence of `hour:minute` in `tz`, strictly after
/// `after`.
pub fn next_occurrence(hour: u8, minute: u8, tz: Tz, after: DateTime<Utc>) -> DateTime<Utc> {
    let local_after = after.with_timezone(&tz);
    let mut date = local_after.date_naive();

    // Today, tomorrow, and one spare day for a DST gap landing on a
    // label's exact time.
    for _ in 0..3 {
        let candidate = tz.with_ymd_and_hms(
            date.year(),
            date.month(),
            date.day(),
            u32::from(hour),
            u32::from(minute),
            0,
        );
        match candidate {
            LocalResult::Single(dt) if dt > local_after => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(early, _) if early > local_after => {
                return early.with_timezone(&Utc);
            }
            _ => {}
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    // Unreachable for any real calendar date; keep the trigger alive
    // rather than panicking.
    after + Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Kiev;

    #[test]
    fn same_day_when_time_is_still_ahead() {
        // 2026-01-15 07:00 Kiev (+02:00 in winter) == 05:00 UTC.
        let after = Utc.with_ymd_and_hms(2026, 1, 15, 5, 0, 0).unwrap();
        let next = next_occurrence(8, 0, Kiev, after);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap());
    }

    #[test]
    fn next_day_when_time_already_passed() {
        // 2026-01-15 09:30 Kiev == 07:30 UTC; 08:00 already went by.
        let after = Utc.with_ymd_and_hms(2026, 1, 15, 7, 30, 0).unwrap();
        let next = next_occurrence(8, 0, Kiev, after);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 16, 6, 0, 0).unwrap());
    }

    #[test]
    fn exact_hit_rolls_to_the_next_day() {
        // Firing exactly at 08:00 must schedule tomorrow, not refire today.
        let after = Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap();
        let next = next_occurrence(8, 0, Kiev, after);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 16, 6, 0, 0).unwrap());
    }

    #[test]
    fn summer_offset_differs_from_winter() {
        // 2026-07-15: Kiev is +03:00, so 08:00 local == 05:00 UTC.
        let after = Utc.with_ymd_and_hms(2026, 7, 15, 0, 0, 0).unwrap();
        let next = next_occurrence(8, 0, Kiev, after);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 7, 15, 5, 0, 0).unwrap());
    }

    #[test]
    fn spring_forward_gap_rolls_to_next_day() {
        // Ukraine springs forward on the last Sunday of March; in 2026
        // that is 03-29, when 03:00–03:59 local does not exist.
        let after = Utc.with_ymd_and_hms(2026, 3, 29, 0, 0, 0).unwrap();
        let next = next_occurrence(3, 30, Kiev, after);
        // Next valid 03:30 is on 03-30, at +03:00.
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 30, 0, 30, 0).unwrap());
    }
}
