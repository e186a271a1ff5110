//! Note repository contract and store-backed implementation.
//!
//! # Responsibility
//! - Expose domain-shaped CRUD on top of a [`NoteStore`].
//! - Project the store's observable table into a stream of note lists.
//!
//! # Invariants
//! - No validation, caching or retry happens here; errors pass through as-is.

use crate::model::note::{Note, NoteId};
use crate::repo::mapper::NoteMapper;
use crate::store::{NoteStore, StorageResult};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;

/// Lazy, continuously updated sequence of full note lists.
pub type NoteListStream = BoxStream<'static, StorageResult<Vec<Note>>>;

/// Domain-level data access for notes.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Current list ordered by recency, re-emitted after every change.
    fn get_notes(&self) -> NoteListStream;
    async fn get_note_by_id(&self, id: NoteId) -> StorageResult<Option<Note>>;
    /// Persists a note and returns its row id.
    async fn add_note(&self, note: &Note) -> StorageResult<NoteId>;
    async fn update_note(&self, note: &Note) -> StorageResult<()>;
    async fn delete_note(&self, note: &Note) -> StorageResult<()>;
    async fn delete_all_notes(&self) -> StorageResult<()>;
}

/// Repository over the on-device store.
pub struct LocalNoteRepository {
    store: Arc<dyn NoteStore>,
    mapper: NoteMapper,
}

impl LocalNoteRepository {
    pub fn new(store: Arc<dyn NoteStore>, mapper: NoteMapper) -> Self {
        Self { store, mapper }
    }
}

#[async_trait]
impl NoteRepository for LocalNoteRepository {
    fn get_notes(&self) -> NoteListStream {
        let mapper = self.mapper;
        self.store
            .observe_all()
            .map(move |snapshot| {
                snapshot.map(|entities| {
                    entities
                        .into_iter()
                        .map(|entity| mapper.to_domain(entity))
                        .collect()
                })
            })
            .boxed()
    }

    async fn get_note_by_id(&self, id: NoteId) -> StorageResult<Option<Note>> {
        let entity = self.store.get_by_id(id).await?;
        Ok(entity.map(|entity| self.mapper.to_domain(entity)))
    }

    async fn add_note(&self, note: &Note) -> StorageResult<NoteId> {
        self.store.insert(self.mapper.to_entity(note)).await
    }

    async fn update_note(&self, note: &Note) -> StorageResult<()> {
        self.store.update(self.mapper.to_entity(note)).await
    }

    async fn delete_note(&self, note: &Note) -> StorageResult<()> {
        self.store.delete(self.mapper.to_entity(note)).await
    }

    async fn delete_all_notes(&self) -> StorageResult<()> {
        self.store.delete_all().await
    }
}
