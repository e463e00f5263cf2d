//! Human-readable durations.

use chrono::{DateTime, Utc};

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Renders hours and minutes as "Xh Ym", or "Ym" when under an hour.
///
/// A minute count that rounds up to 60 carries into the hour.
fn hours_minutes(mut hours: i64, mut minutes: i64) -> String {
    if minutes >= 60 {
        hours += minutes / 60;
        minutes %= 60;
    }
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Formats a fractional number of hours.
///
/// Hours are floored and the leftover minutes rounded. Negative or NaN
/// input renders as "0m".
#[allow(clippy::cast_possible_truncation)]
pub fn format_duration(hours: f64) -> String {
    if hours.is_nan() || hours <= 0.0 {
        return "0m".to_string();
    }
    let whole = hours.floor();
    let minutes = ((hours - whole) * 60.0).round();
    hours_minutes(whole as i64, minutes as i64)
}

/// Formats the time from `now` until `target`, e.g. "in 1h 30m".
///
/// Returns "Now" when `target` is not in the future.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn format_time_until(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (target - now).num_milliseconds();
    if diff_ms <= 0 {
        return "Now".to_string();
    }
    let hours = diff_ms / MS_PER_HOUR;
    let minutes = ((diff_ms % MS_PER_HOUR) as f64 / MS_PER_MINUTE as f64).round() as i64;
    format!("in {}", hours_minutes(hours, minutes))
}
