//! Session lifecycle: the Idle/Working state machine.

use crate::core::session::Session;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};

/// Observable tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No session running; `start` is available.
    Idle,

    /// A session is running; `stop` is available.
    Working,
}

impl TrackerState {
    /// Status line shown next to the controls.
    #[must_use]
    pub fn status_text(self) -> &'static str {
        match self {
            Self::Idle => "Ready to work",
            Self::Working => "Working...",
        }
    }

    /// Whether the start control is enabled.
    #[must_use]
    pub fn can_start(self) -> bool {
        self == Self::Idle
    }

    /// Whether the stop control is enabled.
    #[must_use]
    pub fn can_stop(self) -> bool {
        self == Self::Working
    }
}

/// Owns the completed session list and the at-most-one active session.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    sessions: Vec<Session>,
    active: Option<Session>,
}

impl Tracker {
    /// Create an idle tracker with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle tracker seeded with previously saved sessions.
    #[must_use]
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        Self {
            sessions,
            active: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TrackerState {
        if self.active.is_some() {
            TrackerState::Working
        } else {
            TrackerState::Idle
        }
    }

    /// Completed sessions in insertion order.
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// The running session, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    /// Time spent in the running session, zero when idle.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        self.active
            .as_ref()
            .map_or_else(Duration::zero, |session| session.elapsed(now))
    }

    /// Start a session now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyWorking`] if a session is running; nothing changes.
    pub fn start(&mut self) -> Result<&Session> {
        self.start_at(Utc::now())
    }

    /// Start a session at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyWorking`] if a session is running; nothing changes.
    pub fn start_at(&mut self, now: DateTime<Utc>) -> Result<&Session> {
        if self.active.is_some() {
            return Err(Error::AlreadyWorking);
        }
        Ok(&*self.active.insert(Session::started_at(now)))
    }

    /// Stop the running session now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotWorking`] if no session is running; nothing changes.
    pub fn stop(&mut self) -> Result<Session> {
        self.stop_at(Utc::now())
    }

    /// Stop the running session at `now`, append it to history and return it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotWorking`] if no session is running; nothing changes.
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Result<Session> {
        let mut session = self.active.take().ok_or(Error::NotWorking)?;
        session.end_time = Some(now);
        self.sessions.push(session.clone());
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, h, m, 0).unwrap()
    }

    #[test]
    fn new_tracker_is_idle() {
        let tracker = Tracker::new();
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(tracker.active().is_none());
        assert!(tracker.sessions().is_empty());
        assert_eq!(tracker.elapsed(at(9, 0)), Duration::zero());
    }

    #[test]
    fn start_then_stop_records_session() {
        let mut tracker = Tracker::new();

        tracker.start_at(at(9, 0)).unwrap();
        assert_eq!(tracker.state(), TrackerState::Working);
        assert_eq!(tracker.elapsed(at(9, 10)), Duration::minutes(10));

        let done = tracker.stop_at(at(10, 30)).unwrap();
        assert_eq!(done, Session::completed(at(9, 0), at(10, 30)));
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert_eq!(tracker.sessions(), &[done]);
    }

    #[test]
    fn start_while_working_is_rejected() {
        let mut tracker = Tracker::new();
        tracker.start_at(at(9, 0)).unwrap();

        let result = tracker.start_at(at(9, 5));
        assert!(matches!(result, Err(Error::AlreadyWorking)));

        // Original start time is kept
        assert_eq!(tracker.active().unwrap().start_time, at(9, 0));
    }

    #[test]
    fn stop_while_idle_is_rejected() {
        let mut tracker = Tracker::new();
        let result = tracker.stop_at(at(9, 0));
        assert!(matches!(result, Err(Error::NotWorking)));
        assert!(tracker.sessions().is_empty());
    }

    #[test]
    fn seeded_history_is_appended_to() {
        let earlier = Session::completed(at(7, 0), at(8, 0));
        let mut tracker = Tracker::with_sessions(vec![earlier.clone()]);
        assert_eq!(tracker.state(), TrackerState::Idle);

        tracker.start_at(at(9, 0)).unwrap();
        let later = tracker.stop_at(at(9, 30)).unwrap();

        assert_eq!(tracker.sessions(), &[earlier, later]);
    }

    #[test]
    fn state_controls_and_status() {
        assert!(TrackerState::Idle.can_start());
        assert!(!TrackerState::Idle.can_stop());
        assert!(TrackerState::Working.can_stop());
        assert!(!TrackerState::Working.can_start());
        assert_eq!(TrackerState::Idle.status_text(), "Ready to work");
        assert_eq!(TrackerState::Working.status_text(), "Working...");
    }
}
