//! One-second timer display for the running session.

use crate::core::format::format_clock;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Timer readout shown while idle.
pub const IDLE_CLOCK: &str = "00:00:00";

/// Periodically publishes the elapsed time of a session as `HH:MM:SS`.
///
/// The readout is published on a [`watch`] channel so any number of displays can
/// observe it. Dropping or stopping the ticker aborts the background task and
/// resets the readout.
#[derive(Debug)]
pub struct Ticker {
    display: watch::Sender<String>,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Create an idle ticker.
    #[must_use]
    pub fn new() -> Self {
        let (display, _) = watch::channel(IDLE_CLOCK.to_string());
        Self {
            display,
            task: None,
        }
    }

    /// Subscribe to the readout.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.subscribe()
    }

    /// Current readout.
    #[must_use]
    pub fn readout(&self) -> String {
        self.display.borrow().clone()
    }

    /// Whether a tick task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Start ticking for a session that began at `started`.
    ///
    /// Must be called from within a tokio runtime. Any previous tick task is replaced.
    pub fn start(&mut self, started: DateTime<Utc>, period: Duration) {
        self.abort();

        let display = self.display.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let readout = format_clock(Utc::now() - started);
                trace!(%readout, "tick");
                display.send_replace(readout);
            }
        }));
    }

    /// Abort the tick task and reset the readout.
    pub fn stop(&mut self) {
        self.abort();
        self.display.send_replace(IDLE_CLOCK.to_string());
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.abort();
    }
}
