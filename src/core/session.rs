//! Work session record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One work interval.
///
/// Serialized as `{"startTime": ..., "endTime": ...}` with RFC 3339 timestamps;
/// `endTime` is `null` while the session is still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// When work started.
    pub start_time: DateTime<Utc>,

    /// When work stopped. `None` while active.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Session {
    /// Begin a session at `start_time`.
    #[must_use]
    pub fn started_at(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: None,
        }
    }

    /// A session that has already finished.
    #[must_use]
    pub fn completed(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: Some(end_time),
        }
    }

    /// Whether the session is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// Length of a completed session, `None` while active.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Time elapsed between the start and `now`.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        self.end_time.unwrap_or(now) - self.start_time
    }
}
