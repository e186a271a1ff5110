//! Composition root: wires store, repository, use-case and state holders.

use crate::config::AppConfig;
use crate::model::note::NoteId;
use crate::presentation::note_detail_view_model::NoteDetailViewModel;
use crate::presentation::notes_view_model::NotesViewModel;
use crate::presentation::saved_state::SavedStateHandle;
use crate::repo::mapper::NoteMapper;
use crate::repo::note_repo::{LocalNoteRepository, NoteRepository};
use crate::service::notes_use_case::NotesUseCase;
use crate::store::{NoteStore, SqliteNoteStore, StorageResult};
use log::info;
use std::sync::Arc;

/// Application-scoped dependencies shared by every screen.
#[derive(Clone)]
pub struct AppModule {
    store: Arc<dyn NoteStore>,
    notes_use_case: NotesUseCase,
}

impl AppModule {
    /// Opens the database named by `config` and builds the pipeline on it.
    pub fn open(config: &AppConfig) -> StorageResult<Self> {
        let store = SqliteNoteStore::open(&config.db_path)?;
        info!(
            "event=app_module_init module=app status=ok db_path={}",
            config.db_path.display()
        );
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Pipeline over a private in-memory database.
    pub fn in_memory() -> StorageResult<Self> {
        Ok(Self::with_store(Arc::new(SqliteNoteStore::open_in_memory()?)))
    }

    pub fn with_store(store: Arc<dyn NoteStore>) -> Self {
        let repository: Arc<dyn NoteRepository> = Arc::new(LocalNoteRepository::new(
            Arc::clone(&store),
            NoteMapper,
        ));
        Self {
            store,
            notes_use_case: NotesUseCase::new(repository),
        }
    }

    pub fn store(&self) -> &Arc<dyn NoteStore> {
        &self.store
    }

    pub fn notes_use_case(&self) -> &NotesUseCase {
        &self.notes_use_case
    }

    /// State holder for the list screen; see [`NotesViewModel::new`].
    pub fn notes_view_model(&self, saved_state: SavedStateHandle) -> NotesViewModel {
        NotesViewModel::new(self.notes_use_case.clone(), saved_state)
    }

    /// State holder for the detail screen; see [`NoteDetailViewModel::new`].
    pub fn note_detail_view_model(
        &self,
        note_id: NoteId,
        saved_state: SavedStateHandle,
    ) -> NoteDetailViewModel {
        NoteDetailViewModel::new(note_id, self.notes_use_case.clone(), saved_state)
    }
}
