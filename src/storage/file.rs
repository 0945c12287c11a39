//! File-based storage backend.

use crate::error::Result;
use crate::storage::traits::SessionStore;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Single JSON file holding the whole collection as a pretty-printed array.
///
/// Appends are read-modify-write cycles serialized by an in-process lock and
/// finished with an atomic rename, so a reader never sees a half-written file.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Create a new file backend. Touches nothing on disk.
    ///
    /// The data file and its parent directory are created on the first append.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the collection, treating a missing, empty or malformed file as empty.
    fn read_records(&self) -> Result<Vec<Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&contents) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "data file is not a JSON array; treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    fn write_records(&self, records: &[Value]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.path.with_extension("tmp");

        // Write to temp file first
        let contents = serde_json::to_string_pretty(records)?;
        fs::write(&temp, &contents)?;

        // Atomic rename - prevents corruption if process crashes mid-write
        fs::rename(&temp, &self.path)?;

        Ok(())
    }
}

impl SessionStore for FileBackend {
    fn append(&self, record: &Value) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut records = self.read_records()?;
        records.push(record.clone());
        self.write_records(&records)?;

        debug!(path = %self.path.display(), total = records.len(), "appended record");
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Value>> {
        self.read_records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_backend() -> (FileBackend, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().join("sessions.json"));
        (backend, temp_dir)
    }

    fn record(n: u32) -> Value {
        json!({
            "startTime": format!("2025-03-14T{n:02}:00:00Z"),
            "endTime": format!("2025-03-14T{n:02}:30:00Z"),
        })
    }

    #[test]
    fn reading_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        let store = FileBackend::new(nested.join("sessions.json"));

        assert!(store.list_all().unwrap().is_empty());
        assert!(!nested.exists());
    }

    #[test]
    fn append_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("deeper");
        let store = FileBackend::new(nested.join("sessions.json"));

        store.append(&record(1)).unwrap();
        assert!(nested.exists());
        assert_eq!(store.list_all().unwrap(), vec![record(1)]);
    }

    #[test]
    fn list_missing_file_is_empty() {
        let (store, _temp) = create_test_backend();
        assert!(!store.path().exists());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn list_empty_file_is_empty() {
        let (store, _temp) = create_test_backend();
        fs::write(store.path(), "").unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn list_corrupted_file_is_empty() {
        let (store, _temp) = create_test_backend();
        fs::write(store.path(), "{ this is not valid json }").unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn append_and_list_preserve_order() {
        let (store, _temp) = create_test_backend();

        for n in 1..=3 {
            store.append(&record(n)).unwrap();
        }

        assert_eq!(store.list_all().unwrap(), vec![record(1), record(2), record(3)]);
    }

    #[test]
    fn duplicates_are_kept() {
        let (store, _temp) = create_test_backend();
        store.append(&record(1)).unwrap();
        store.append(&record(1)).unwrap();
        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn any_json_is_stored_as_is() {
        let (store, _temp) = create_test_backend();
        store.append(&json!({"note": "anything"})).unwrap();
        store.append(&json!("plain string")).unwrap();

        assert_eq!(
            store.list_all().unwrap(),
            vec![json!({"note": "anything"}), json!("plain string")]
        );
    }

    #[test]
    fn file_is_pretty_printed_array() {
        let (store, _temp) = create_test_backend();
        store.append(&record(9)).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.starts_with("[\n  {"));
        let parsed: Vec<Value> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, vec![record(9)]);
    }

    #[test]
    fn atomic_write_creates_no_temp_file() {
        let (store, temp_dir) = create_test_backend();
        store.append(&record(1)).unwrap();

        assert!(!temp_dir.path().join("sessions.tmp").exists());
        assert!(store.path().exists());
    }

    #[test]
    fn append_over_corrupted_file_starts_fresh() {
        let (store, _temp) = create_test_backend();
        fs::write(store.path(), "[{ truncated").unwrap();

        store.append(&record(1)).unwrap();
        assert_eq!(store.list_all().unwrap(), vec![record(1)]);
    }

    #[test]
    fn append_to_unwritable_location_errors() {
        let temp_dir = TempDir::new().unwrap();
        // The data file path is an existing directory, so the rename must fail
        let path = temp_dir.path().join("occupied");
        fs::create_dir_all(path.join("child")).unwrap();
        let store = FileBackend::new(path);

        assert!(store.append(&record(1)).is_err());
    }

    #[test]
    fn concurrent_appends_lose_nothing() {
        use std::sync::Arc;
        use std::thread;

        let (store, _temp) = create_test_backend();
        let store = Arc::new(store);

        let mut handles = vec![];
        for i in 0..8 {
            let store_clone = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for j in 0..5 {
                    store_clone.append(&json!({"writer": i, "seq": j})).unwrap();
                }
            }));
        }

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(store.list_all().unwrap().len(), 40);
    }
}
