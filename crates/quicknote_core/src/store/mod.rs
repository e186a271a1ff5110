//! Persistence store for note rows.
//!
//! # Responsibility
//! - Own CRUD over the `notes` table and its change notifications.
//! - Keep SQL and blocking I/O behind an async, object-safe contract.
//!
//! # Invariants
//! - `observe_all` snapshots are ordered by `timestamp DESC, id DESC`.
//! - Every mutation that changes rows publishes exactly one `TableChange`.
//! - Each operation is atomic on its own; nothing spans multiple calls.

use crate::db::DbError;
use crate::model::note::NoteId;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite;

pub use sqlite::SqliteNoteStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Any failure of the underlying persistence operation.
#[derive(Debug)]
pub enum StorageError {
    /// SQLite or schema failure.
    Db(DbError),
    /// The blocking worker running the statement panicked or was cancelled.
    Worker(String),
    /// A previous statement panicked while holding the connection.
    LockPoisoned,
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Worker(details) => write!(f, "storage worker failed: {details}"),
            Self::LockPoisoned => write!(f, "storage connection lock poisoned"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Worker(_) | Self::LockPoisoned => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence row shape of the `notes` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntity {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub timestamp: i64,
}

/// Kind of mutation published to `observe_all` subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableChange {
    Inserted(NoteId),
    Updated(NoteId),
    Deleted(NoteId),
    Cleared,
}

/// Stream of full-table snapshots; see [`NoteStore::observe_all`].
pub type NoteEntityStream = BoxStream<'static, StorageResult<Vec<NoteEntity>>>;

/// Local persistence contract for notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Emits the current rows, then a fresh snapshot after table changes.
    ///
    /// Bursts of changes that arrive before a re-query may be coalesced into
    /// one snapshot. The stream ends only when dropped.
    fn observe_all(&self) -> NoteEntityStream;
    /// Loads one row, `None` when the id does not exist.
    async fn get_by_id(&self, id: NoteId) -> StorageResult<Option<NoteEntity>>;
    /// Inserts a row, or replaces the row with the same non-zero id.
    ///
    /// A zero id lets SQLite assign a fresh one. Returns the row id.
    async fn insert(&self, entity: NoteEntity) -> StorageResult<NoteId>;
    /// Overwrites the row with `entity.id`; no-op when it does not exist.
    async fn update(&self, entity: NoteEntity) -> StorageResult<()>;
    /// Removes the row with `entity.id`.
    async fn delete(&self, entity: NoteEntity) -> StorageResult<()>;
    /// Clears the table in one statement.
    async fn delete_all(&self) -> StorageResult<()>;
    /// Number of stored rows.
    async fn count(&self) -> StorageResult<u64>;
}
