//! State holder for the note list screen.
//!
//! # Responsibility
//! - Mirror the use-case note stream into reactive list state.
//! - Run "delete all" and report it through a one-shot message.
//! - Relay any `result` message left in saved state by a returning screen.
//!
//! # Invariants
//! - The stream subscription lives exactly as long as the state holder.
//! - A relayed `result` is queued once and the slot is cleared afterwards.

use crate::model::note::Note;
use crate::presentation::effects::{EffectQueue, EffectReceiver};
use crate::presentation::saved_state::{SavedStateHandle, KEY_RESULT};
use crate::presentation::scope::TaskScope;
use crate::repo::note_repo::NoteListStream;
use crate::service::notes_use_case::NotesUseCase;
use futures::StreamExt;
use log::{debug, error, info};
use tokio::sync::{mpsc, watch};

pub const ALL_NOTES_DELETED_MESSAGE: &str = "All notes deleted";

/// One-shot notifications for the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesEffect {
    ShowMessage(String),
}

pub struct NotesViewModel {
    use_case: NotesUseCase,
    saved_state: SavedStateHandle,
    notes: watch::Receiver<Vec<Note>>,
    effects: EffectQueue<NotesEffect>,
    scope: TaskScope,
}

impl NotesViewModel {
    /// Starts observing notes and saved-state results.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn new(use_case: NotesUseCase, saved_state: SavedStateHandle) -> Self {
        let (notes_tx, notes) = watch::channel(Vec::new());
        let effects = EffectQueue::new();
        let scope = TaskScope::new("notes_list");

        scope.spawn(collect_notes(use_case.get_notes(), notes_tx));
        scope.spawn(relay_results(saved_state.clone(), effects.sender()));

        Self {
            use_case,
            saved_state,
            notes,
            effects,
            scope,
        }
    }

    /// Observer of the latest note list, newest first.
    pub fn notes(&self) -> watch::Receiver<Vec<Note>> {
        self.notes.clone()
    }

    pub fn current_notes(&self) -> Vec<Note> {
        self.notes.borrow().clone()
    }

    pub fn saved_state(&self) -> &SavedStateHandle {
        &self.saved_state
    }

    /// Hands out the effect queue to the screen; only the first call succeeds.
    pub fn take_effects(&self) -> Option<EffectReceiver<NotesEffect>> {
        self.effects.take_receiver()
    }

    pub fn delete_all_notes(&self) {
        let use_case = self.use_case.clone();
        let effects = self.effects.sender();
        self.scope.spawn(async move {
            match use_case.delete_all().await {
                Ok(()) => {
                    info!("event=notes_delete_all module=notes_vm status=ok");
                    let message = NotesEffect::ShowMessage(ALL_NOTES_DELETED_MESSAGE.to_string());
                    let _ = effects.send(message).await;
                }
                Err(err) => {
                    error!("event=notes_delete_all module=notes_vm status=error error={err}");
                }
            }
        });
    }

    /// Stops all background work, as when the screen is destroyed.
    pub fn clear(&self) {
        self.scope.cancel();
    }
}

async fn collect_notes(mut stream: NoteListStream, notes: watch::Sender<Vec<Note>>) {
    while let Some(snapshot) = stream.next().await {
        match snapshot {
            Ok(list) => {
                debug!("event=notes_observe module=notes_vm status=ok count={}", list.len());
                notes.send_replace(list);
            }
            Err(err) => error!("event=notes_observe module=notes_vm status=error error={err}"),
        }
    }
}

async fn relay_results(saved_state: SavedStateHandle, effects: mpsc::Sender<NotesEffect>) {
    let mut changes = saved_state.subscribe();
    loop {
        let pending = changes
            .borrow_and_update()
            .get(KEY_RESULT)
            .filter(|message| !message.trim().is_empty())
            .cloned();

        if let Some(message) = pending {
            if effects.send(NotesEffect::ShowMessage(message)).await.is_err() {
                break;
            }
            saved_state.set(KEY_RESULT, "");
        }

        if changes.changed().await.is_err() {
            break;
        }
    }
}
