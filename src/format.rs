//! Time and unit formatting helpers
//!
//! Upstream timestamps are Unix seconds plus a separate UTC offset in seconds.
//! Every formatter shifts the instant by the offset and then reads UTC fields,
//! so the offset stands in for a real timezone.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Weekday names indexed from Sunday
pub const WEEK_DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Abbreviated month names indexed from January
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Shifts a Unix timestamp by a UTC offset and returns it as a UTC datetime.
///
/// Out-of-range instants collapse to the Unix epoch.
pub fn shifted(unix_seconds: i64, timezone_offset_seconds: i32) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_seconds + i64::from(timezone_offset_seconds), 0)
        .unwrap_or_default()
}

/// Weekday name for a shifted instant
pub fn weekday_name(at: &DateTime<Utc>) -> &'static str {
    WEEK_DAY_NAMES[at.weekday().num_days_from_sunday() as usize]
}

/// Abbreviated month name for a shifted instant
pub fn month_name(at: &DateTime<Utc>) -> &'static str {
    MONTH_NAMES[at.month0() as usize]
}

/// Formats a date as `"<Weekday> <DayOfMonth>, <Month>"`, e.g. `"Sunday 10, Jan"`.
pub fn format_date(unix_seconds: i64, timezone_offset_seconds: i32) -> String {
    let at = shifted(unix_seconds, timezone_offset_seconds);
    format!("{} {}, {}", weekday_name(&at), at.day(), month_name(&at))
}

/// Converts a 24-hour clock hour into a 12-hour hour and its period
fn hour12(hours: u32) -> (u32, &'static str) {
    let period = if hours >= 12 { "PM" } else { "AM" };
    let hour = match hours % 12 {
        0 => 12,
        h => h,
    };
    (hour, period)
}

/// Formats a time as `"<hour12>:<minute> AM|PM"`, e.g. `"9:05 AM"`.
pub fn format_time(unix_seconds: i64, timezone_offset_seconds: i32) -> String {
    let at = shifted(unix_seconds, timezone_offset_seconds);
    let (hour, period) = hour12(at.hour());
    format!("{}:{:02} {}", hour, at.minute(), period)
}

/// Formats an hour label as `"<hour12> AM|PM"`, e.g. `"3 PM"`.
pub fn format_hour_label(unix_seconds: i64, timezone_offset_seconds: i32) -> String {
    let at = shifted(unix_seconds, timezone_offset_seconds);
    let (hour, period) = hour12(at.hour());
    format!("{} {}", hour, period)
}

/// Converts meters per second to kilometers per hour
pub fn meters_per_second_to_km_per_hour(mps: f64) -> f64 {
    mps * 3.6
}

/// Truncates toward zero for whole-number display (`-0.7` shows as `0`).
pub fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

/// Formats a number with a fixed count of significant digits.
///
/// Small and mid-range magnitudes use fixed notation (`0.500`, `12.3`, `123`);
/// large or tiny magnitudes switch to exponent notation (`1.23e+3`).
pub fn to_precision(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", digits - 1, 0.0);
    }

    let mut exponent = value.abs().log10().floor() as i32;
    // Rounding can carry into the next power of ten (9.996 -> 10.0)
    let scale = 10f64.powi(digits as i32 - 1 - exponent);
    if (value.abs() * scale).round() >= 10f64.powi(digits as i32) {
        exponent += 1;
    }

    if exponent < -6 || exponent >= digits as i32 {
        let formatted = format!("{:.*e}", digits - 1, value);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    format!("{:.*}", decimals, value)
}
