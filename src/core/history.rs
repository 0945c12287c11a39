//! Recent-sessions table.

use crate::core::format::format_duration;
use crate::core::session::Session;
use chrono::{Duration, TimeZone};
use std::fmt;

/// Number of sessions shown in the history view.
pub const HISTORY_LIMIT: usize = 10;

/// Text shown when no session has been recorded.
pub const EMPTY_PLACEHOLDER: &str = "No sessions recorded yet";

/// One rendered row of the history view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    /// Stand-in row for an empty history.
    Placeholder,

    /// A recorded session.
    Row {
        /// Start date, `YYYY-MM-DD`.
        date: String,
        /// Start time, `HH:MM:SS`.
        start: String,
        /// End time, `HH:MM:SS`, or `In progress`.
        end: String,
        /// Elapsed time, `Xh Ym`.
        duration: String,
    },
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str(EMPTY_PLACEHOLDER),
            Self::Row {
                date,
                start,
                end,
                duration,
            } => write!(f, "{date:<12} {start:<10} {end:<12} {duration}"),
        }
    }
}

/// Render the newest [`HISTORY_LIMIT`] sessions, latest first, in timezone `tz`.
#[must_use]
pub fn recent_history<Tz: TimeZone>(sessions: &[Session], tz: &Tz) -> Vec<HistoryEntry>
where
    Tz::Offset: fmt::Display,
{
    if sessions.is_empty() {
        return vec![HistoryEntry::Placeholder];
    }

    sessions
        .iter()
        .rev()
        .take(HISTORY_LIMIT)
        .map(|session| render_row(session, tz))
        .collect()
}

fn render_row<Tz: TimeZone>(session: &Session, tz: &Tz) -> HistoryEntry
where
    Tz::Offset: fmt::Display,
{
    let start = session.start_time.with_timezone(tz);
    let end = session.end_time.map(|e| e.with_timezone(tz));

    HistoryEntry::Row {
        date: start.format("%Y-%m-%d").to_string(),
        start: start.format("%H:%M:%S").to_string(),
        end: end.map_or_else(
            || "In progress".to_string(),
            |e| e.format("%H:%M:%S").to_string(),
        ),
        duration: format_duration(session.duration().unwrap_or_else(Duration::zero)),
    }
}
