//! Core session types, lifecycle and derived views.

pub mod format;
pub mod history;
pub mod session;
pub mod stats;
pub mod ticker;
pub mod tracker;

pub use format::{format_clock, format_duration, format_minutes, format_now};
pub use history::{HISTORY_LIMIT, HistoryEntry, recent_history};
pub use session::Session;
pub use stats::DailyStats;
pub use ticker::Ticker;
pub use tracker::{Tracker, TrackerState};
