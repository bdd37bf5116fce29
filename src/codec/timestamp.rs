//! Epoch millisecond conventions.
//!
//! YouTrack transmits instants as integer milliseconds since the Unix epoch.
//! Calendar dates travel as the millisecond value of noon UTC on that day, so
//! that every timezone maps them back to the same date.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

/// Field type id of simple custom fields holding an instant.
pub const DATE_AND_TIME: &str = "date and time";

const NOON_OFFSET_HOURS: i64 = 12;

/// Milliseconds since the epoch for an instant.
pub fn datetime_to_millis(value: &DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

/// Milliseconds since the epoch of noon UTC on `date`.
pub fn date_to_millis(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::default()).and_utc();
    (midnight + TimeDelta::hours(NOON_OFFSET_HOURS)).timestamp_millis()
}

/// The instant at `millis` since the epoch, if representable.
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// The calendar date encoded by `millis`, undoing the noon offset.
pub fn millis_to_date(millis: i64) -> Option<NaiveDate> {
    let instant = millis_to_datetime(millis)?;
    instant
        .checked_sub_signed(TimeDelta::hours(NOON_OFFSET_HOURS))
        .map(|noon| noon.date_naive())
}
