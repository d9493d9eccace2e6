//! Weekly publish-slot arithmetic.

use std::fmt;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),
    #[error("invalid time of day '{0}' (expected HH:MM)")]
    InvalidTime(String),
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
    #[error("week offset must not be negative (got {0})")]
    NegativeOffset(i64),
    #[error("local time {0} does not exist in timezone {1}")]
    NonexistentLocalTime(NaiveDateTime, String),
}

/// A recurring weekly slot such as "Monday 08:00 Europe/Berlin".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub weekday: Weekday,
    pub time: NaiveTime,
    pub timezone: Tz,
}

impl ScheduleSlot {
    pub fn parse(day: &str, time: &str, timezone: &str) -> Result<Self, ScheduleError> {
        Ok(Self {
            weekday: parse_weekday(day)?,
            time: parse_time_of_day(time)?,
            timezone: parse_timezone(timezone)?,
        })
    }

    /// The `week_offset`-th upcoming occurrence of this slot after `now`, as a UTC instant.
    pub fn occurrence(
        &self,
        now: DateTime<Utc>,
        week_offset: i64,
    ) -> Result<DateTime<Utc>, ScheduleError> {
        let local_now = now.with_timezone(&self.timezone);
        next_occurrence(&local_now, self.weekday, self.time, week_offset)
    }
}

/// Accepts full English weekday names and three-letter abbreviations, case-insensitively.
pub fn parse_weekday(name: &str) -> Result<Weekday, ScheduleError> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_| ScheduleError::UnknownWeekday(name.to_string()))
}

pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ScheduleError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ScheduleError::InvalidTime(value.to_string()))
}

pub fn parse_timezone(name: &str) -> Result<Tz, ScheduleError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Ok(Tz::UTC);
    }
    trimmed
        .parse::<Tz>()
        .map_err(|_| ScheduleError::UnknownTimezone(name.to_string()))
}

/// Next date on or after `now` falling on `weekday` at `time`, pushed out by `week_offset` weeks.
///
/// When `now` already falls on `weekday` but `time` is not strictly ahead of it, the first
/// occurrence is the following week. A local time repeated by a DST fall-back resolves to the
/// earlier instant unless only the later one is still ahead. The result is always strictly after
/// `now`.
pub fn next_occurrence<Z: TimeZone + fmt::Debug>(
    now: &DateTime<Z>,
    weekday: Weekday,
    time: NaiveTime,
    week_offset: i64,
) -> Result<DateTime<Utc>, ScheduleError> {
    if week_offset < 0 {
        return Err(ScheduleError::NegativeOffset(week_offset));
    }

    let zone = now.timezone();
    let now_utc = now.with_timezone(&Utc);
    let local_now = now.naive_local();
    let today = local_now.date();
    let days_ahead = (7 + weekday.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;

    let mut date = today + Duration::days(i64::from(days_ahead));
    if days_ahead == 0 {
        let slot = date.and_time(time);
        let passed = slot <= local_now
            || resolve_local(&zone, slot).is_ok_and(|(_, latest)| latest <= now_utc);
        if passed {
            date += Duration::weeks(1);
        }
    }
    date += Duration::weeks(week_offset);

    let (earliest, latest) = resolve_local(&zone, date.and_time(time))?;
    Ok(if earliest > now_utc { earliest } else { latest })
}

/// Earliest and latest UTC instants for a local wall-clock time; equal unless it is ambiguous.
fn resolve_local<Z: TimeZone + fmt::Debug>(
    zone: &Z,
    local: NaiveDateTime,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ScheduleError> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(at) => {
            let at = at.with_timezone(&Utc);
            Ok((at, at))
        }
        LocalResult::Ambiguous(first, second) => {
            Ok((first.with_timezone(&Utc), second.with_timezone(&Utc)))
        }
        LocalResult::None => Err(ScheduleError::NonexistentLocalTime(
            local,
            format!("{zone:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_next_monday_from_thursday() {
        let now = utc(2025, 10, 16, 12, 0); // Thursday
        let at = next_occurrence(&now, Weekday::Mon, hm(8, 0), 0).unwrap();
        assert_eq!(at, utc(2025, 10, 20, 8, 0));
    }

    #[test]
    fn test_same_day_before_slot_uses_today() {
        let now = utc(2025, 10, 16, 12, 0);
        let at = next_occurrence(&now, Weekday::Thu, hm(13, 30), 0).unwrap();
        assert_eq!(at, utc(2025, 10, 16, 13, 30));
    }

    #[test]
    fn test_same_day_after_slot_advances_a_week() {
        let now = utc(2025, 10, 16, 12, 0);
        let at = next_occurrence(&now, Weekday::Thu, hm(8, 0), 0).unwrap();
        assert_eq!(at, utc(2025, 10, 23, 8, 0));

        let exact = next_occurrence(&now, Weekday::Thu, hm(12, 0), 0).unwrap();
        assert_eq!(exact, utc(2025, 10, 23, 12, 0));
    }

    #[test]
    fn test_offset_staggers_by_whole_weeks() {
        let now = utc(2025, 10, 16, 12, 0);
        let first = next_occurrence(&now, Weekday::Mon, hm(8, 0), 0).unwrap();
        let second = next_occurrence(&now, Weekday::Mon, hm(8, 0), 1).unwrap();
        let fifth = next_occurrence(&now, Weekday::Mon, hm(8, 0), 4).unwrap();
        assert_eq!(second, utc(2025, 10, 27, 8, 0));
        assert_eq!(fifth - first, Duration::weeks(4));
    }

    #[test]
    fn test_negative_offset_is_rejected() {
        let now = utc(2025, 10, 16, 12, 0);
        let err = next_occurrence(&now, Weekday::Mon, hm(8, 0), -1).unwrap_err();
        assert_eq!(err, ScheduleError::NegativeOffset(-1));
    }

    #[test]
    fn test_never_in_past_and_offsets_are_seven_days_apart() {
        let weekdays = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        let nows = [
            utc(2025, 10, 16, 0, 0),
            utc(2025, 10, 18, 23, 59),
            utc(2025, 12, 31, 12, 0),
            utc(2028, 2, 28, 7, 45),
        ];
        let times = [hm(0, 0), hm(7, 45), hm(12, 0), hm(23, 59)];

        for now in nows {
            for weekday in weekdays {
                for time in times {
                    for offset in 0..3 {
                        let at = next_occurrence(&now, weekday, time, offset).unwrap();
                        let next = next_occurrence(&now, weekday, time, offset + 1).unwrap();
                        assert!(at > now, "{at} should be after {now}");
                        assert_eq!(at.weekday(), weekday);
                        assert_eq!(at.time(), time);
                        assert_eq!(next - at, Duration::days(7));
                    }
                }
            }
        }
    }

    #[test]
    fn test_slot_converts_local_time_to_utc() {
        let slot = ScheduleSlot::parse("monday", "08:00", "America/New_York").unwrap();
        let now = utc(2025, 10, 16, 12, 0);
        let at = slot.occurrence(now, 0).unwrap();
        // EDT is UTC-4 in October.
        assert_eq!(at, utc(2025, 10, 20, 12, 0));
    }

    #[test]
    fn test_nonexistent_local_time_is_an_error() {
        // 2025-03-09 02:30 is skipped by the US spring-forward transition.
        let zone = parse_timezone("America/New_York").unwrap();
        let now = zone.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap();
        let err = next_occurrence(&now, Weekday::Sun, hm(2, 30), 0).unwrap_err();
        let expected = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap().and_time(hm(2, 30));
        assert!(matches!(err, ScheduleError::NonexistentLocalTime(at, _) if at == expected));
    }

    #[test]
    fn test_repeated_fall_back_hour_never_lands_in_past() {
        // 2025-11-02 01:00-02:00 happens twice in New York; 06:30 UTC is 01:30 EST.
        let slot = ScheduleSlot::parse("sunday", "01:45", "America/New_York").unwrap();
        let now = utc(2025, 11, 2, 6, 30);

        let at = slot.occurrence(now, 0).unwrap();
        assert!(at > now, "{at} should be after {now}");
        assert_eq!(at, utc(2025, 11, 2, 6, 45));
        assert_eq!(slot.occurrence(now, 1).unwrap(), utc(2025, 11, 9, 6, 45));

        // During the first pass (EDT) the earlier 01:45 is still ahead.
        let during_edt = utc(2025, 11, 2, 5, 30);
        assert_eq!(slot.occurrence(during_edt, 0).unwrap(), utc(2025, 11, 2, 5, 45));

        // After both passes the next slot is a week out.
        let after = utc(2025, 11, 2, 6, 50);
        assert_eq!(slot.occurrence(after, 0).unwrap(), utc(2025, 11, 9, 6, 45));
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday(" fri ").unwrap(), Weekday::Fri);
        assert!(parse_weekday("Funday").is_err());

        assert_eq!(parse_time_of_day("08:00").unwrap(), hm(8, 0));
        assert_eq!(parse_time_of_day("23:15:00").unwrap(), hm(23, 15));
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("noon").is_err());

        assert_eq!(parse_timezone("").unwrap(), Tz::UTC);
        assert!(parse_timezone("Mars/Olympus_Mons").is_err());
    }
}
