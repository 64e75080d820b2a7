use chrono::{Local, NaiveDateTime, TimeZone};

use crate::error::InputError;

/// Shown wherever a timestamp is missing or zero.
pub const TIME_PLACEHOLDER: &str = "N/A";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Converts an HTML `datetime-local` value, read in the host time zone, to
/// Unix seconds. An empty value means "unset" and maps to `0`.
///
/// # Errors
///
/// Returns [`InputError::DateTime`] when the value matches none of the
/// accepted layouts or names a wall-clock time skipped by a DST change.
pub fn datetime_local_to_unix(value: &str) -> Result<i64, InputError> {
    datetime_local_to_unix_in(value, &Local)
}

pub fn datetime_local_to_unix_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<i64, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    let invalid = || InputError::DateTime {
        value: value.to_string(),
    };
    let naive = INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(invalid)?;
    // Ambiguous wall-clock times (DST fall-back) resolve to the first occurrence.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(invalid)
}

/// Formats Unix seconds as local wall-clock time.
pub fn unix_to_local(sec: i64) -> String {
    unix_to_local_in(sec, &Local)
}

pub fn unix_to_local_in<Tz>(sec: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if sec == 0 {
        return TIME_PLACEHOLDER.to_string();
    }
    tz.timestamp_opt(sec, 0).single().map_or_else(
        || format!("(marca de tiempo inválida: {sec})"),
        |d| d.format(DISPLAY_FORMAT).to_string(),
    )
}
