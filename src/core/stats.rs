//! Today's totals computed from the session list.

use crate::core::format::format_minutes;
use crate::core::session::Session;
use chrono::{DateTime, TimeZone};

/// Aggregate statistics for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyStats {
    /// Summed duration of today's completed sessions, in milliseconds.
    pub total_millis: i64,

    /// Number of today's completed sessions.
    pub session_count: usize,
}

impl DailyStats {
    /// Compute statistics for the calendar day containing `now`.
    ///
    /// A session counts when it has finished and its start time, viewed in `now`'s
    /// timezone, falls on the same date as `now`.
    #[must_use]
    pub fn for_day<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        sessions
            .iter()
            .filter(|s| s.start_time.with_timezone(&tz).date_naive() == today)
            .filter_map(Session::duration)
            .fold(Self::default(), |mut stats, duration| {
                stats.total_millis += duration.num_milliseconds();
                stats.session_count += 1;
                stats
            })
    }

    /// Total whole minutes worked.
    #[must_use]
    pub fn total_minutes(&self) -> i64 {
        self.total_millis / 60_000
    }

    /// Average session length in whole minutes, 0 when there are no sessions.
    #[must_use]
    pub fn average_minutes(&self) -> i64 {
        match i64::try_from(self.session_count) {
            Ok(count) if count > 0 => self.total_millis / 60_000 / count,
            _ => 0,
        }
    }

    /// Total time as `"Xh Ym"`.
    #[must_use]
    pub fn total_display(&self) -> String {
        format_minutes(self.total_minutes())
    }

    /// Average as `"Nmin"`.
    #[must_use]
    pub fn average_display(&self) -> String {
        format!("{}min", self.average_minutes())
    }
}
