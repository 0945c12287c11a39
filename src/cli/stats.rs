//! `worklog stats` command implementation.

use crate::core::DailyStats;
use crate::error::Result;
use crate::storage::{FileBackend, SessionStore, decode_sessions};
use chrono::Local;
use std::path::Path;

/// Run the stats command.
///
/// Reads the data file directly and prints today's totals.
///
/// # Errors
///
/// Returns an error if the data file cannot be read.
pub fn run(data_file: &Path) -> Result<()> {
    let store = FileBackend::new(data_file.to_path_buf());
    let sessions = decode_sessions(store.list_all()?);
    let stats = DailyStats::for_day(&sessions, &Local::now());

    print!("{}", render_stats(&stats));
    Ok(())
}

/// Render the three stat cards as aligned lines.
#[must_use]
pub fn render_stats(stats: &DailyStats) -> String {
    format!(
        "Today's Stats\n{}\n{:<14}{}\n{:<14}{}\n{:<14}{}\n",
        "─".repeat(30),
        "Total Hours",
        stats.total_display(),
        "Sessions",
        stats.session_count,
        "Avg Session",
        stats.average_display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_empty_stats() {
        let rendered = render_stats(&DailyStats::default());
        assert!(rendered.contains("Total Hours   0m"));
        assert!(rendered.contains("Sessions      0"));
        assert!(rendered.contains("Avg Session   0min"));
    }

    #[test]
    fn renders_totals() {
        let stats = DailyStats {
            total_millis: 125 * 60_000,
            session_count: 2,
        };
        let rendered = render_stats(&stats);
        assert!(rendered.contains("2h 5m"));
        assert!(rendered.contains("62min"));
    }

    #[test]
    fn run_on_missing_file_succeeds() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        run(&temp_dir.path().join("sessions.json")).unwrap();
    }

    #[test]
    fn run_leaves_missing_directory_alone() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let home = temp_dir.path().join(".worklog");
        run(&home.join("sessions.json")).unwrap();
        assert!(!home.exists());
    }
}
