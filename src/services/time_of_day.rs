use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::ClockError;

/// Calendar date every time-of-day is projected onto before comparison.
pub const REFERENCE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2000, 1, 1) {
    Some(date) => date,
    None => panic!("reference date out of range"),
};

/// A wall-clock time in the configured zone, pinned to [`REFERENCE_DATE`].
///
/// Only [`ZonedClock::normalize`] and [`TimeOfDay::from_time`] build one, so a
/// raw instant can never be compared against a normalized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveDateTime);

impl TimeOfDay {
    /// Anchors a schedule boundary, which is already a zone-local time of day.
    pub fn from_time(time: NaiveTime) -> Self {
        Self(REFERENCE_DATE.and_time(time))
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn is_before(self, other: Self) -> bool {
        self.0 < other.0
    }

    pub fn is_after(self, other: Self) -> bool {
        self.0 > other.0
    }

    /// Whole minutes from `earlier` to `self`, truncated toward zero.
    pub fn minutes_since(self, earlier: Self) -> i64 {
        (self.0 - earlier.0).num_minutes()
    }

    pub fn hours_since(self, earlier: Self) -> f64 {
        hours_from_minutes(self.minutes_since(earlier))
    }
}

/// Zone-aware conversions between instants, calendar days and times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn normalize(&self, instant: DateTime<Utc>) -> TimeOfDay {
        TimeOfDay::from_time(instant.with_timezone(&self.tz).time())
    }

    /// Calendar day `instant` falls on in the configured zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// The instant a zone-local wall-clock time occurs on `date`. Ambiguous
    /// times (DST fold) resolve to the earlier instant.
    pub fn instant_at(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, ClockError> {
        let local = date.and_time(time);
        self.tz
            .from_local_datetime(&local)
            .earliest()
            .map(|zoned| zoned.with_timezone(&Utc))
            .ok_or(ClockError::UnrepresentableLocalTime(local))
    }
}

pub fn hours_from_minutes(minutes: i64) -> f64 {
    minutes as f64 / 60.0
}

/// Hours are persisted with two decimals.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn manila() -> ZonedClock {
        ZonedClock::new(chrono_tz::Asia::Manila)
    }

    #[test]
    fn normalizes_into_the_configured_zone() {
        // 00:30 UTC is 08:30 in Manila (UTC+8)
        let instant = Utc.with_ymd_and_hms(2024, 5, 6, 0, 30, 0).unwrap();
        let normalized = manila().normalize(instant);

        assert_eq!(normalized, TimeOfDay::from_time(hm(8, 30)));
        assert_eq!(normalized.hour(), 8);
    }

    #[test]
    fn different_calendar_days_compare_by_time_only() {
        let monday = Utc.with_ymd_and_hms(2024, 5, 6, 1, 0, 0).unwrap();
        let a_year_later = Utc.with_ymd_and_hms(2025, 5, 6, 0, 0, 0).unwrap();

        let earlier = manila().normalize(a_year_later);
        let later = manila().normalize(monday);
        assert!(earlier.is_before(later));
        assert!(later.is_after(earlier));
        assert_eq!(later.minutes_since(earlier), 60);
    }

    #[test]
    fn local_date_follows_the_zone_not_utc() {
        // 17:00 UTC on the 6th is already 01:00 on the 7th in Manila
        let instant = Utc.with_ymd_and_hms(2024, 5, 6, 17, 0, 0).unwrap();
        assert_eq!(
            manila().local_date(instant),
            NaiveDate::from_ymd_opt(2024, 5, 7).unwrap()
        );

        let utc_clock = ZonedClock::new(chrono_tz::UTC);
        assert_eq!(
            utc_clock.local_date(instant),
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
        );
    }

    #[test]
    fn instant_at_inverts_normalization() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let instant = manila().instant_at(date, hm(17, 0)).unwrap();

        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
        assert_eq!(manila().normalize(instant), TimeOfDay::from_time(hm(17, 0)));
    }

    #[test]
    fn instant_at_rejects_times_skipped_by_dst() {
        let new_york = ZonedClock::new(chrono_tz::America::New_York);
        let spring_forward = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        assert!(matches!(
            new_york.instant_at(spring_forward, hm(2, 30)),
            Err(ClockError::UnrepresentableLocalTime(_))
        ));
    }

    #[test]
    fn minute_differences_truncate_seconds() {
        let start = TimeOfDay::from_time(NaiveTime::from_hms_opt(8, 0, 50).unwrap());
        let end = TimeOfDay::from_time(hm(8, 30));
        assert_eq!(end.minutes_since(start), 29);
        assert_eq!(round_hours(end.hours_since(start)), 0.48);
    }
}
