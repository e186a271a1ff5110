//! Screen-scoped, crash-survivable key/value state.
//!
//! # Responsibility
//! - Hold small string slots (drafts, relayed results) for one navigation
//!   entry.
//! - Notify observers on change and serialize to a snapshot that can be
//!   restored after process death.
//!
//! # Invariants
//! - Writing the value a key already holds does not notify observers.
//! - Clones share the same underlying state.

use serde_json::Error as JsonError;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::watch;

/// Draft title of the note being edited.
pub const KEY_DRAFT_TITLE: &str = "draft_title";
/// Draft content of the note being edited.
pub const KEY_DRAFT_CONTENT: &str = "draft_content";
/// One-shot message relayed to the entry below when a screen returns.
pub const KEY_RESULT: &str = "result";

pub type SavedStateMap = BTreeMap<String, String>;

#[derive(Debug)]
pub enum SavedStateError {
    Snapshot(JsonError),
}

impl Display for SavedStateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snapshot(err) => write!(f, "invalid saved state snapshot: {err}"),
        }
    }
}

impl Error for SavedStateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Snapshot(err) => Some(err),
        }
    }
}

impl From<JsonError> for SavedStateError {
    fn from(value: JsonError) -> Self {
        Self::Snapshot(value)
    }
}

/// Shared handle to one navigation entry's recoverable state.
#[derive(Clone)]
pub struct SavedStateHandle {
    state: Arc<watch::Sender<SavedStateMap>>,
}

impl Default for SavedStateHandle {
    fn default() -> Self {
        Self::from_map(SavedStateMap::new())
    }
}

impl SavedStateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: SavedStateMap) -> Self {
        let (state, _) = watch::channel(map);
        Self {
            state: Arc::new(state),
        }
    }

    /// Rebuilds a handle from [`SavedStateHandle::snapshot`] output.
    pub fn restore(snapshot: &str) -> Result<Self, SavedStateError> {
        let map: SavedStateMap = serde_json::from_str(snapshot)?;
        Ok(Self::from_map(map))
    }

    /// Serializes all slots as a JSON object.
    pub fn snapshot(&self) -> Result<String, SavedStateError> {
        Ok(serde_json::to_string(&*self.state.borrow())?)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.state.borrow().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.borrow().contains_key(key)
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        let value = value.into();
        self.state.send_if_modified(|map| {
            if map.get(key) == Some(&value) {
                return false;
            }
            map.insert(key.to_string(), value);
            true
        });
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        let mut removed = None;
        self.state.send_if_modified(|map| {
            removed = map.remove(key);
            removed.is_some()
        });
        removed
    }

    /// Receives the whole map after every effective change.
    pub fn subscribe(&self) -> watch::Receiver<SavedStateMap> {
        self.state.subscribe()
    }
}
