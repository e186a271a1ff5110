//! Navigation contract between screens.
//!
//! # Responsibility
//! - Define the two screen routes and their path encoding.
//! - Own one [`SavedStateHandle`] per back stack entry.
//!
//! # Invariants
//! - `note_id == 0` on the detail route means "create a new note".
//! - The root entry (note list) is never popped.

use crate::model::note::{NoteId, NEW_NOTE_ID};
use crate::presentation::saved_state::{SavedStateHandle, KEY_RESULT};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const NOTE_LIST_ROUTE: &str = "note_list_screen";
const NOTE_DETAIL_PREFIX: &str = "note_detail_screen/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    Unknown(String),
    InvalidNoteId(String),
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(path) => write!(f, "unknown route `{path}`"),
            Self::InvalidNoteId(value) => write!(f, "invalid noteId `{value}`"),
        }
    }
}

impl Error for RouteError {}

/// Logical screen destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    NoteList,
    NoteDetail { note_id: NoteId },
}

impl Route {
    /// Detail route for creating a note.
    pub fn new_note() -> Self {
        Self::NoteDetail {
            note_id: NEW_NOTE_ID,
        }
    }

    /// Concrete path with parameters filled in.
    pub fn path(&self) -> String {
        match self {
            Self::NoteList => NOTE_LIST_ROUTE.to_string(),
            Self::NoteDetail { note_id } => format!("{NOTE_DETAIL_PREFIX}{note_id}"),
        }
    }

    pub fn parse(path: &str) -> Result<Self, RouteError> {
        if path == NOTE_LIST_ROUTE {
            return Ok(Self::NoteList);
        }
        match path.strip_prefix(NOTE_DETAIL_PREFIX) {
            Some(raw_id) => raw_id
                .parse::<NoteId>()
                .map(|note_id| Self::NoteDetail { note_id })
                .map_err(|_| RouteError::InvalidNoteId(raw_id.to_string())),
            None => Err(RouteError::Unknown(path.to_string())),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One visited screen plus its recoverable state.
#[derive(Clone)]
pub struct BackStackEntry {
    route: Route,
    saved_state: SavedStateHandle,
}

impl BackStackEntry {
    pub fn route(&self) -> Route {
        self.route
    }

    pub fn saved_state(&self) -> &SavedStateHandle {
        &self.saved_state
    }
}

/// Linear navigation history rooted at the note list.
pub struct BackStack {
    entries: Vec<BackStackEntry>,
}

impl Default for BackStack {
    fn default() -> Self {
        Self::new()
    }
}

impl BackStack {
    pub fn new() -> Self {
        Self {
            entries: vec![BackStackEntry {
                route: Route::NoteList,
                saved_state: SavedStateHandle::new(),
            }],
        }
    }

    pub fn current(&self) -> &BackStackEntry {
        // `entries` always holds the root.
        &self.entries[self.entries.len() - 1]
    }

    /// Number of entries, root included; never below one.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Pushes `route` with fresh saved state and returns the new entry.
    pub fn navigate(&mut self, route: Route) -> &BackStackEntry {
        debug!("event=navigate module=nav route={route}");
        self.entries.push(BackStackEntry {
            route,
            saved_state: SavedStateHandle::new(),
        });
        self.current()
    }

    /// Pops the current entry; `None` when already at the root.
    pub fn pop(&mut self) -> Option<BackStackEntry> {
        if self.entries.len() <= 1 {
            return None;
        }
        let popped = self.entries.pop();
        if let Some(entry) = &popped {
            debug!("event=navigate_back module=nav from={}", entry.route);
        }
        popped
    }

    /// Pops and leaves `message` under `result` for the entry below.
    pub fn pop_with_result(&mut self, message: impl Into<String>) -> Option<BackStackEntry> {
        let popped = self.pop()?;
        self.current().saved_state.set(KEY_RESULT, message);
        Some(popped)
    }
}
