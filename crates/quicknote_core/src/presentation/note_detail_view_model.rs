//! State holder for the create/edit note screen.
//!
//! # Responsibility
//! - Load the note being edited and keep title/content drafts.
//! - Mirror drafts into saved state so they survive process death.
//! - Save (add or update) and delete, then signal the screen.
//!
//! # Invariants
//! - A fetched note never overwrites a draft field that is already non-empty.
//! - Saving with a blank (trimmed) title does nothing: no write, no effect.
//! - `save_note` keeps the screen's id when editing and uses `0` otherwise.

use crate::model::note::{now_epoch_ms, Note, NoteId, NEW_NOTE_ID};
use crate::presentation::effects::{EffectQueue, EffectReceiver};
use crate::presentation::saved_state::{SavedStateHandle, KEY_DRAFT_CONTENT, KEY_DRAFT_TITLE};
use crate::presentation::scope::TaskScope;
use crate::service::notes_use_case::NotesUseCase;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::watch;

/// Load progress of the detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    /// Creating a note; nothing to load.
    New,
    /// Fetch by id in flight.
    Loading,
    /// Fetch finished (found or not).
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDetailState {
    pub phase: DetailPhase,
    /// Note as loaded from storage, `None` for new or missing notes.
    pub note: Option<Note>,
    pub title: String,
    pub content: String,
}

impl NoteDetailState {
    /// Whether drafts can be edited (anything but `Loading`).
    pub fn is_ready(&self) -> bool {
        self.phase != DetailPhase::Loading
    }
}

/// One-shot signals for the detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailEffect {
    /// Save finished; the screen should navigate back.
    NavigateBack,
    /// Delete finished.
    NoteDeleted,
}

pub struct NoteDetailViewModel {
    note_id: NoteId,
    use_case: NotesUseCase,
    saved_state: SavedStateHandle,
    state: Arc<watch::Sender<NoteDetailState>>,
    effects: EffectQueue<DetailEffect>,
    scope: TaskScope,
}

impl NoteDetailViewModel {
    /// Creates the state holder for `note_id` (`0` creates a new note).
    ///
    /// Drafts are restored from `saved_state`; a non-zero id starts a fetch.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn new(note_id: NoteId, use_case: NotesUseCase, saved_state: SavedStateHandle) -> Self {
        let phase = if note_id == NEW_NOTE_ID {
            DetailPhase::New
        } else {
            DetailPhase::Loading
        };
        let (state, _) = watch::channel(NoteDetailState {
            phase,
            note: None,
            title: saved_state.get(KEY_DRAFT_TITLE).unwrap_or_default(),
            content: saved_state.get(KEY_DRAFT_CONTENT).unwrap_or_default(),
        });
        let state = Arc::new(state);
        let scope = TaskScope::new("note_detail");

        if phase == DetailPhase::Loading {
            scope.spawn(load_note(note_id, use_case.clone(), Arc::clone(&state)));
        }

        Self {
            note_id,
            use_case,
            saved_state,
            state,
            effects: EffectQueue::new(),
            scope,
        }
    }

    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    pub fn state(&self) -> watch::Receiver<NoteDetailState> {
        self.state.subscribe()
    }

    pub fn current_state(&self) -> NoteDetailState {
        self.state.borrow().clone()
    }

    pub fn saved_state(&self) -> &SavedStateHandle {
        &self.saved_state
    }

    /// Hands out the effect queue to the screen; only the first call succeeds.
    pub fn take_effects(&self) -> Option<EffectReceiver<DetailEffect>> {
        self.effects.take_receiver()
    }

    pub fn on_title_change(&self, title: impl Into<String>) {
        let title = title.into();
        self.saved_state.set(KEY_DRAFT_TITLE, title.clone());
        self.state.send_modify(|state| state.title = title);
    }

    pub fn on_content_change(&self, content: impl Into<String>) {
        let content = content.into();
        self.saved_state.set(KEY_DRAFT_CONTENT, content.clone());
        self.state.send_modify(|state| state.content = content);
    }

    /// Persists the trimmed drafts, then queues [`DetailEffect::NavigateBack`].
    ///
    /// A blank title abandons the save silently.
    pub fn save_note(&self) {
        let editing = self.note_id > NEW_NOTE_ID;
        let id = if editing { self.note_id } else { NEW_NOTE_ID };
        let note = {
            let state = self.state.borrow();
            Note::with_id(id, state.title.trim(), state.content.trim(), now_epoch_ms())
        };
        if note.has_blank_title() {
            debug!("event=note_save module=detail_vm status=skipped reason=blank_title");
            return;
        }

        let use_case = self.use_case.clone();
        let saved_state = self.saved_state.clone();
        let effects = self.effects.sender();

        self.scope.spawn(async move {
            let saved = if editing {
                use_case.update_note(&note).await.map(|()| note.id)
            } else {
                use_case.add_note(&note).await
            };
            match saved {
                Ok(saved_id) => {
                    info!("event=note_save module=detail_vm status=ok id={saved_id} editing={editing}");
                    saved_state.set(KEY_DRAFT_TITLE, "");
                    saved_state.set(KEY_DRAFT_CONTENT, "");
                    let _ = effects.send(DetailEffect::NavigateBack).await;
                }
                Err(err) => {
                    error!("event=note_save module=detail_vm status=error editing={editing} error={err}");
                }
            }
        });
    }

    /// Deletes the loaded note, then queues [`DetailEffect::NoteDeleted`].
    ///
    /// No-op while nothing is loaded.
    pub fn delete_note(&self) {
        let Some(note) = self.state.borrow().note.clone() else {
            debug!("event=note_delete module=detail_vm status=skipped reason=not_loaded");
            return;
        };
        let use_case = self.use_case.clone();
        let effects = self.effects.sender();

        self.scope.spawn(async move {
            match use_case.delete_note(&note).await {
                Ok(()) => {
                    info!("event=note_delete module=detail_vm status=ok id={}", note.id);
                    let _ = effects.send(DetailEffect::NoteDeleted).await;
                }
                Err(err) => {
                    error!(
                        "event=note_delete module=detail_vm status=error id={} error={err}",
                        note.id
                    );
                }
            }
        });
    }

    /// Stops all background work, as when the screen is destroyed.
    pub fn clear(&self) {
        self.scope.cancel();
    }
}

async fn load_note(
    note_id: NoteId,
    use_case: NotesUseCase,
    state: Arc<watch::Sender<NoteDetailState>>,
) {
    let fetched = match use_case.get_note_by_id(note_id).await {
        Ok(Some(note)) => Some(note),
        Ok(None) => {
            warn!("event=note_load module=detail_vm status=not_found id={note_id}");
            None
        }
        Err(err) => {
            error!("event=note_load module=detail_vm status=error id={note_id} error={err}");
            None
        }
    };

    state.send_modify(|state| {
        if let Some(note) = &fetched {
            if state.title.is_empty() {
                state.title = note.title.clone();
            }
            if state.content.is_empty() {
                state.content = note.content.clone();
            }
        }
        state.note = fetched;
        state.phase = DetailPhase::Ready;
    });
}
