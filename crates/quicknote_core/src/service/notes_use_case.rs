//! Notes use-case facade.
//!
//! # Invariants
//! - Every call forwards to the repository unchanged; no added behavior.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteListStream, NoteRepository};
use crate::store::StorageResult;
use std::sync::Arc;

/// Cloneable pass-through over a shared [`NoteRepository`].
#[derive(Clone)]
pub struct NotesUseCase {
    repo: Arc<dyn NoteRepository>,
}

impl NotesUseCase {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub fn get_notes(&self) -> NoteListStream {
        self.repo.get_notes()
    }

    pub async fn get_note_by_id(&self, id: NoteId) -> StorageResult<Option<Note>> {
        self.repo.get_note_by_id(id).await
    }

    pub async fn add_note(&self, note: &Note) -> StorageResult<NoteId> {
        self.repo.add_note(note).await
    }

    pub async fn update_note(&self, note: &Note) -> StorageResult<()> {
        self.repo.update_note(note).await
    }

    pub async fn delete_note(&self, note: &Note) -> StorageResult<()> {
        self.repo.delete_note(note).await
    }

    pub async fn delete_all(&self) -> StorageResult<()> {
        self.repo.delete_all_notes().await
    }
}
