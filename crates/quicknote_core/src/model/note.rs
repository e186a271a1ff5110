//! Note domain model.
//!
//! # Invariants
//! - `id == NEW_NOTE_ID` until the store assigns a row id.
//! - `timestamp` is refreshed on every save and is the list sort key.
//! - Persisted titles are never blank; the detail screen discards blank saves.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Row identifier assigned by the store.
pub type NoteId = i64;

/// Sentinel id for a note that has not been persisted yet.
pub const NEW_NOTE_ID: NoteId = 0;

/// User-authored title/content pair with a recency timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Unix epoch milliseconds of the last save.
    pub timestamp: i64,
}

impl Note {
    /// Creates an unsaved note stamped with the given time.
    pub fn new(title: impl Into<String>, content: impl Into<String>, timestamp: i64) -> Self {
        Self::with_id(NEW_NOTE_ID, title, content, timestamp)
    }

    pub fn with_id(
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            timestamp,
        }
    }

    /// Returns whether this note still waits for its first save.
    pub fn is_new(&self) -> bool {
        self.id == NEW_NOTE_ID
    }

    /// Returns whether the title is empty after trimming.
    pub fn has_blank_title(&self) -> bool {
        self.title.trim().is_empty()
    }
}

/// Current wall clock time in epoch milliseconds.
///
/// Clocks set before 1970 yield `0` instead of failing.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
