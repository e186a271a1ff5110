//! Core of the QuickNote note-taking app.
//! Owns the notes table, its observable projection and the screen state
//! holders built on top of it.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod repo;
pub mod service;
pub mod store;

pub use app::AppModule;
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::display::format_last_updated;
pub use model::note::{now_epoch_ms, Note, NoteId, NEW_NOTE_ID};
pub use presentation::nav::{BackStack, BackStackEntry, Route, RouteError};
pub use presentation::note_detail_view_model::{
    DetailEffect, DetailPhase, NoteDetailState, NoteDetailViewModel,
};
pub use presentation::notes_view_model::{
    NotesEffect, NotesViewModel, ALL_NOTES_DELETED_MESSAGE,
};
pub use presentation::saved_state::{SavedStateError, SavedStateHandle};
pub use repo::mapper::NoteMapper;
pub use repo::note_repo::{LocalNoteRepository, NoteListStream, NoteRepository};
pub use service::notes_use_case::NotesUseCase;
pub use store::{
    NoteEntity, NoteStore, SqliteNoteStore, StorageError, StorageResult, TableChange,
};

/// Minimal health-check API for wiring probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
