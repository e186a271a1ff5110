//! SQLite-backed note store.
//!
//! # Invariants
//! - The connection is only touched inside `spawn_blocking` while holding the
//!   mutex; the guard never lives across an `.await`.
//! - Change notifications are sent after the statement committed.

use super::{NoteEntity, NoteEntityStream, NoteStore, StorageError, StorageResult, TableChange};
use crate::db::{open_db, open_db_in_memory};
use crate::model::note::{NoteId, NEW_NOTE_ID};
use async_trait::async_trait;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    timestamp
FROM notes";

/// Cloneable handle to one SQLite notes database.
///
/// Clones share the connection and the change channel.
#[derive(Clone)]
pub struct SqliteNoteStore {
    conn: Arc<Mutex<Connection>>,
    changes: broadcast::Sender<TableChange>,
}

impl SqliteNoteStore {
    /// Wraps a migrated connection (see [`crate::db::open_db`]).
    pub fn new(conn: Connection) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            conn: Arc::new(Mutex::new(conn)),
            changes,
        }
    }

    /// Opens the database file at `path`, applying migrations.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Raw table-change notifications, mostly useful for diagnostics.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<TableChange> {
        self.changes.subscribe()
    }

    async fn run<T, F>(&self, event: &'static str, work: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StorageResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let started_at = Instant::now();
        let result = tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StorageError::LockPoisoned)?;
            work(&guard)
        })
        .await
        .unwrap_or_else(|join_err| Err(StorageError::Worker(join_err.to_string())));

        match &result {
            Ok(_) => debug!(
                "event={event} module=store status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event={event} module=store status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn publish(&self, change: TableChange) {
        // A send error only means nobody is observing right now.
        let _ = self.changes.send(change);
    }

    async fn query_all(&self) -> StorageResult<Vec<NoteEntity>> {
        self.run("note_query_all", |conn| {
            let mut stmt =
                conn.prepare(&format!("{NOTE_SELECT_SQL} ORDER BY timestamp DESC, id DESC;"))?;
            let mut rows = stmt.query([])?;
            let mut notes = Vec::new();
            while let Some(row) = rows.next()? {
                notes.push(parse_note_row(row)?);
            }
            Ok(notes)
        })
        .await
    }
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    fn observe_all(&self) -> NoteEntityStream {
        let store = self.clone();
        // Subscribe before the first query so no change can slip in between.
        let mut changes = self.changes.subscribe();
        Box::pin(async_stream::stream! {
            loop {
                yield store.query_all().await;

                match changes.recv().await {
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("event=note_observe module=store status=lagged skipped={skipped}");
                    }
                    Err(RecvError::Closed) => break,
                }
                // Anything queued meanwhile is covered by the next snapshot.
                loop {
                    match changes.try_recv() {
                        Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                        Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                    }
                }
            }
        })
    }

    async fn get_by_id(&self, id: NoteId) -> StorageResult<Option<NoteEntity>> {
        self.run("note_get", move |conn| {
            let entity = conn
                .query_row(
                    &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                    [id],
                    parse_note_row,
                )
                .optional()?;
            Ok(entity)
        })
        .await
    }

    async fn insert(&self, entity: NoteEntity) -> StorageResult<NoteId> {
        let id = self
            .run("note_insert", move |conn| {
                if entity.id <= NEW_NOTE_ID {
                    conn.execute(
                        "INSERT INTO notes (title, content, timestamp) VALUES (?1, ?2, ?3);",
                        params![entity.title, entity.content, entity.timestamp],
                    )?;
                } else {
                    conn.execute(
                        "INSERT OR REPLACE INTO notes (id, title, content, timestamp)
                         VALUES (?1, ?2, ?3, ?4);",
                        params![entity.id, entity.title, entity.content, entity.timestamp],
                    )?;
                }
                Ok(conn.last_insert_rowid())
            })
            .await?;

        self.publish(TableChange::Inserted(id));
        Ok(id)
    }

    async fn update(&self, entity: NoteEntity) -> StorageResult<()> {
        let id = entity.id;
        let changed = self
            .run("note_update", move |conn| {
                let changed = conn.execute(
                    "UPDATE notes
                     SET
                        title = ?2,
                        content = ?3,
                        timestamp = ?4
                     WHERE id = ?1;",
                    params![entity.id, entity.title, entity.content, entity.timestamp],
                )?;
                Ok(changed)
            })
            .await?;

        if changed > 0 {
            self.publish(TableChange::Updated(id));
        }
        Ok(())
    }

    async fn delete(&self, entity: NoteEntity) -> StorageResult<()> {
        let id = entity.id;
        let changed = self
            .run("note_delete", move |conn| {
                Ok(conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?)
            })
            .await?;

        if changed > 0 {
            self.publish(TableChange::Deleted(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> StorageResult<()> {
        let changed = self
            .run("note_delete_all", |conn| {
                Ok(conn.execute("DELETE FROM notes;", [])?)
            })
            .await?;

        if changed > 0 {
            self.publish(TableChange::Cleared);
        }
        Ok(())
    }

    async fn count(&self) -> StorageResult<u64> {
        self.run("note_count", |conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
            Ok(u64::try_from(count).unwrap_or(0))
        })
        .await
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<NoteEntity> {
    Ok(NoteEntity {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        timestamp: row.get("timestamp")?,
    })
}
