//! Interactive tracker: the session state machine wired to its timer and storage.

use crate::client::StorageClient;
use crate::core::{
    DailyStats, HistoryEntry, Session, Ticker, Tracker, TrackerState, format_now, recent_history,
};
use crate::error::Result;
use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Default display refresh period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Outcome of a successful stop.
#[derive(Debug)]
pub struct Stopped {
    /// The session that just finished.
    pub session: Session,

    /// Statistics recomputed after the session was appended.
    pub stats: DailyStats,

    /// Background save, when a storage endpoint is configured.
    pub persist: Option<JoinHandle<()>>,
}

/// Snapshot of everything the tracker shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Idle or working.
    pub state: TrackerState,

    /// Elapsed timer, `HH:MM:SS`.
    pub timer: String,

    /// Wall clock, `YYYY-MM-DD - HH:MM:SS`.
    pub now: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, stop) = match self.state {
            TrackerState::Idle => ("[start]", " stop "),
            TrackerState::Working => (" start ", "[stop]"),
        };
        write!(
            f,
            "{}  {}  {}  {start} {stop}",
            self.now,
            self.timer,
            self.state.status_text()
        )
    }
}

/// Owns the tracker, its display tick and the optional storage client.
#[derive(Debug)]
pub struct Workbench {
    tracker: Tracker,
    ticker: Ticker,
    client: Option<StorageClient>,
    tick_period: Duration,
}

impl Workbench {
    /// Wrap an existing tracker.
    #[must_use]
    pub fn new(tracker: Tracker, client: Option<StorageClient>) -> Self {
        Self {
            tracker,
            ticker: Ticker::new(),
            client,
            tick_period: TICK_PERIOD,
        }
    }

    /// Reload saved sessions from the endpoint, starting empty if that fails.
    pub async fn load(client: Option<StorageClient>) -> Self {
        let sessions = match &client {
            Some(client) => match client.fetch_sessions().await {
                Ok(sessions) => {
                    info!(count = sessions.len(), endpoint = client.base_url(), "loaded sessions");
                    sessions
                }
                Err(e) => {
                    warn!(error = %e, endpoint = client.base_url(), "could not load sessions; starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self::new(Tracker::with_sessions(sessions), client)
    }

    /// Override the display refresh period.
    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// The underlying tracker.
    #[must_use]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Start working and begin the display tick.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AlreadyWorking`] if a session is running.
    pub fn start(&mut self) -> Result<DateTime<Utc>> {
        let started = self.tracker.start()?.start_time;
        self.ticker.start(started, self.tick_period);
        info!(%started, "work started");
        Ok(started)
    }

    /// Stop working, record the session and save it in the background.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotWorking`] if no session is running.
    pub fn stop(&mut self) -> Result<Stopped> {
        let session = self.tracker.stop()?;
        self.ticker.stop();
        info!(start = %session.start_time, "work stopped");

        let persist = self
            .client
            .as_ref()
            .map(|client| client.save_detached(session.clone()));

        Ok(Stopped {
            session,
            stats: self.stats(),
            persist,
        })
    }

    /// Stop an active session, if any, and wait for its save to finish.
    pub async fn finish(&mut self) -> Option<Session> {
        let stopped = self.stop().ok()?;
        if let Some(persist) = stopped.persist {
            if let Err(e) = persist.await {
                warn!(error = %e, "save task did not complete");
            }
        }
        Some(stopped.session)
    }

    /// Current display snapshot.
    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            state: self.tracker.state(),
            timer: self.ticker.readout(),
            now: format_now(&Local::now()),
        }
    }

    /// Today's statistics.
    #[must_use]
    pub fn stats(&self) -> DailyStats {
        DailyStats::for_day(self.tracker.sessions(), &Local::now())
    }

    /// Recent-sessions table.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        recent_history(self.tracker.sessions(), &Local)
    }
}
