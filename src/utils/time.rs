use anyhow::Result;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Utc};

const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const START_TIME_FORMAT_ISO: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn room_offset(utc_offset_hours: i32) -> Result<FixedOffset> {
    utc_offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| anyhow::anyhow!("UTC offset out of range: {} hours", utc_offset_hours))
}

/// Wall-clock time of the room.
pub fn current_datetime(offset: FixedOffset) -> NaiveDateTime {
    Utc::now().with_timezone(&offset).naive_local()
}

/// Accepts whole-second and sub-second timestamps, with a space or `T` separator.
pub fn parse_start_time(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, START_TIME_FORMAT) {
        return Ok(datetime);
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, START_TIME_FORMAT_ISO) {
        return Ok(datetime);
    }

    Err(anyhow::anyhow!("Invalid start time: {:?}", raw))
}

pub fn format_start_time(datetime: NaiveDateTime) -> String {
    datetime.format(START_TIME_FORMAT).to_string()
}

/// Reads a date, tolerating a trailing time part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_duration_seconds(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}
