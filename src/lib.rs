//! worklog - personal work-session tracker.
//!
//! Starts and stops work sessions, derives today's totals and a recent-sessions
//! table, and mirrors finished sessions to a small JSON storage endpoint.

pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod server;
pub mod storage;
pub mod workbench;

pub use config::Config;
pub use error::{Error, Result};
