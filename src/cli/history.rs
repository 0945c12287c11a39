//! `worklog history` command implementation.

use crate::core::{HistoryEntry, recent_history};
use crate::error::Result;
use crate::storage::{FileBackend, SessionStore, decode_sessions};
use chrono::Local;
use std::path::Path;

/// Run the history command.
///
/// Shows the ten most recent sessions from the data file, newest first.
///
/// # Errors
///
/// Returns an error if the data file cannot be read.
pub fn run(data_file: &Path) -> Result<()> {
    let store = FileBackend::new(data_file.to_path_buf());
    let sessions = decode_sessions(store.list_all()?);

    print!("{}", render_history(&recent_history(&sessions, &Local)));
    Ok(())
}

/// Render history rows under a header.
#[must_use]
pub fn render_history(rows: &[HistoryEntry]) -> String {
    let mut out = format!(
        "{:<12} {:<10} {:<12} {}\n{}\n",
        "Date",
        "Start Time",
        "End Time",
        "Duration",
        "─".repeat(48)
    );
    for row in rows {
        out.push_str(&row.to_string());
        out.push('\n');
    }
    out
}
