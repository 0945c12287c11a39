//! Storage trait definitions.

use crate::core::Session;
use crate::error::Result;
use serde_json::Value;
use tracing::warn;

/// Append-only collection of saved session records.
///
/// Records are opaque JSON values: whatever a client posts is stored as-is, in
/// arrival order, without validation or de-duplication.
pub trait SessionStore: Send + Sync {
    /// Append one record to the end of the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn append(&self, record: &Value) -> Result<()>;

    /// Every record in append order. Empty when nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn list_all(&self) -> Result<Vec<Value>>;
}

/// Decode stored records into sessions, skipping any that are not sessions.
#[must_use]
pub fn decode_sessions(records: Vec<Value>) -> Vec<Session> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(index, error = %e, "skipping stored record that is not a session");
                None
            }
        })
        .collect()
}
