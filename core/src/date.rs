//! Calendar-day normalization for record dates.
//!
//! A record's date is a calendar day, but it travels as an instant: the form
//! hands over local midnight of the picked day, and the server may echo a
//! timestamp. Reading calendar fields off an instant in the wrong frame moves
//! the day by one around midnight UTC, most visibly turning the 1st of a
//! month into the last day of the previous one.
//!
//! Both directions go through [`calendar_day`]: shift the instant by the
//! offset of the frame the day was chosen in, then read the calendar fields
//! of the shifted instant. Offsets are minutes east of UTC (`+60` for
//! UTC+1, `-300` for UTC-5).
//!
//! - Write path: the frame is the user's local zone at the picked instant.
//! - Read path: the frame is the offset the timestamp was written in. The
//!   viewer's own offset never enters, so it cannot shift the shown day.

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone,
};

use crate::error::DateError;

pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Wire and display format of a calendar day.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Timestamp without an offset; the fraction is optional.
const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Move an epoch-millisecond instant by an offset given in minutes.
pub fn shift_by_offset(instant_ms: i64, offset_minutes: i32) -> i64 {
    instant_ms.saturating_add(i64::from(offset_minutes) * MILLIS_PER_MINUTE)
}

/// Calendar day of `instant_ms` as seen from a frame `offset_minutes` east of UTC.
pub fn calendar_day(instant_ms: i64, offset_minutes: i32) -> Result<NaiveDate, DateError> {
    DateTime::from_timestamp_millis(shift_by_offset(instant_ms, offset_minutes))
        .map(|shifted| shifted.date_naive())
        .ok_or(DateError::OutOfRange)
}

/// Whole minutes east of UTC. Sub-minute offsets are truncated.
pub fn offset_minutes(offset: &FixedOffset) -> i32 {
    offset.local_minus_utc() / 60
}

/// Normalize a picked date to the `YYYY-MM-DD` string sent to the server.
pub fn submission_date(picked: &DateTime<FixedOffset>) -> Result<String, DateError> {
    let day = calendar_day(picked.timestamp_millis(), offset_minutes(picked.offset()))?;
    Ok(day.format(DAY_FORMAT).to_string())
}

/// Derive the displayed `YYYY-MM-DD` from a date the server sent back.
///
/// Accepts a bare calendar day, an RFC 3339 timestamp, or a timestamp with
/// no offset. The last is already wall-clock time, so its date is used as-is.
pub fn display_date(wire: &str) -> Result<String, DateError> {
    let wire = wire.trim();
    if let Ok(day) = NaiveDate::parse_from_str(wire, DAY_FORMAT) {
        return Ok(day.format(DAY_FORMAT).to_string());
    }
    let day = match DateTime::parse_from_rfc3339(wire) {
        Ok(stamped) => calendar_day(stamped.timestamp_millis(), offset_minutes(stamped.offset()))?,
        Err(_) => NaiveDateTime::parse_from_str(wire, LOCAL_TIMESTAMP_FORMAT)
            .map(|local| local.date())
            .map_err(|_| DateError::Unparseable(wire.to_string()))?,
    };
    Ok(day.format(DAY_FORMAT).to_string())
}

/// The instant a date picker produces for `day` in `tz`: local midnight.
///
/// Ambiguous midnights take the earlier instant. When a DST gap swallows
/// midnight, the result is the first instant of the day after the gap.
pub fn local_midnight<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<FixedOffset> {
    let midnight = day.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.fixed_offset(),
        LocalResult::None => {
            let before_gap = tz.offset_from_utc_datetime(&midnight).fix();
            let instant = midnight - TimeDelta::seconds(i64::from(before_gap.local_minus_utc()));
            tz.from_utc_datetime(&instant).fixed_offset()
        }
    }
}

/// Parse a `YYYY-MM-DD` day typed by the user.
pub fn parse_day(value: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT)
        .map_err(|_| DateError::Unparseable(value.to_string()))
}
