//! Human-readable durations and clock readouts.

use chrono::{DateTime, Duration, TimeZone};
use std::fmt::Display;

/// Format a duration as `"Xh Ym"`, dropping the hours when zero.
///
/// Seconds are floored away; negative durations clamp to `"0m"`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    format_minutes(duration.num_minutes().max(0))
}

/// Format a whole number of minutes as `"Xh Ym"`, dropping the hours when zero.
#[must_use]
pub fn format_minutes(total_minutes: i64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Format elapsed time as a zero-padded `HH:MM:SS` timer.
#[must_use]
pub fn format_clock(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Format the current wall clock as `YYYY-MM-DD - HH:MM:SS`.
#[must_use]
pub fn format_now<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format("%Y-%m-%d - %H:%M:%S").to_string()
}
