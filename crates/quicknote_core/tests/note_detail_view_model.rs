use async_trait::async_trait;
use quicknote_core::presentation::saved_state::{KEY_DRAFT_CONTENT, KEY_DRAFT_TITLE};
use quicknote_core::{
    now_epoch_ms, AppModule, DetailEffect, DetailPhase, Note, NoteDetailState,
    NoteDetailViewModel, NoteEntity, NoteId, NoteListStream, NoteRepository, NoteStore,
    NotesUseCase, SavedStateHandle, StorageError, StorageResult, NEW_NOTE_ID,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

async fn wait_until_ready(vm: &NoteDetailViewModel) -> NoteDetailState {
    let mut state = vm.state();
    let ready = timeout(WAIT, state.wait_for(NoteDetailState::is_ready))
        .await
        .expect("detail state should settle in time")
        .expect("state sender should stay alive")
        .clone();
    ready
}

async fn seed(module: &AppModule, id: NoteId, title: &str, content: &str, timestamp: i64) -> NoteId {
    module
        .store()
        .insert(NoteEntity {
            id,
            title: title.to_string(),
            content: content.to_string(),
            timestamp,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn new_note_starts_editable_with_empty_drafts() {
    let module = AppModule::in_memory().unwrap();
    let vm = module.note_detail_view_model(NEW_NOTE_ID, SavedStateHandle::new());

    let state = vm.current_state();
    assert_eq!(state.phase, DetailPhase::New);
    assert!(state.is_ready());
    assert_eq!(state.note, None);
    assert!(state.title.is_empty());
    assert!(state.content.is_empty());
}

#[tokio::test]
async fn saving_a_new_note_creates_one_row_and_navigates_back_once() {
    let module = AppModule::in_memory().unwrap();
    let saved_state = SavedStateHandle::new();
    let vm = module.note_detail_view_model(NEW_NOTE_ID, saved_state.clone());
    let mut effects = vm.take_effects().unwrap();

    vm.on_title_change("Groceries");
    vm.on_content_change("Milk, eggs");
    assert_eq!(saved_state.get(KEY_DRAFT_TITLE).as_deref(), Some("Groceries"));
    assert_eq!(saved_state.get(KEY_DRAFT_CONTENT).as_deref(), Some("Milk, eggs"));

    let before = now_epoch_ms();
    vm.save_note();
    let effect = timeout(WAIT, effects.recv()).await.unwrap().unwrap();
    let after = now_epoch_ms();

    assert_eq!(effect, DetailEffect::NavigateBack);
    assert!(effects.try_recv().is_err());
    assert_eq!(module.store().count().await.unwrap(), 1);

    let mut notes = module.notes_use_case().get_notes();
    let listed = futures::StreamExt::next(&mut notes)
        .await
        .unwrap()
        .unwrap();
    let saved = &listed[0];
    assert!(saved.id > 0);
    assert_eq!(saved.title, "Groceries");
    assert_eq!(saved.content, "Milk, eggs");
    assert!((before..=after).contains(&saved.timestamp));

    assert_eq!(saved_state.get(KEY_DRAFT_TITLE).as_deref(), Some(""));
    assert_eq!(saved_state.get(KEY_DRAFT_CONTENT).as_deref(), Some(""));
}

#[tokio::test]
async fn saving_an_existing_note_updates_it_in_place() {
    let module = AppModule::in_memory().unwrap();
    assert_eq!(seed(&module, 7, "Plan", "draft", 1_000).await, 7);

    let vm = module.note_detail_view_model(7, SavedStateHandle::new());
    let loaded = wait_until_ready(&vm).await;
    assert_eq!(loaded.phase, DetailPhase::Ready);
    assert_eq!(loaded.title, "Plan");
    assert_eq!(loaded.content, "draft");
    assert_eq!(loaded.note.as_ref().map(|note| note.id), Some(7));

    let mut effects = vm.take_effects().unwrap();
    vm.on_content_change("  final version  ");
    vm.save_note();
    assert_eq!(
        timeout(WAIT, effects.recv()).await.unwrap(),
        Some(DetailEffect::NavigateBack)
    );

    assert_eq!(module.store().count().await.unwrap(), 1);
    let stored = module.store().get_by_id(7).await.unwrap().unwrap();
    assert_eq!(stored.title, "Plan");
    assert_eq!(stored.content, "final version");
    assert!(stored.timestamp > 1_000);
}

#[tokio::test]
async fn blank_title_save_is_silently_ignored() {
    let module = AppModule::in_memory().unwrap();
    let vm = module.note_detail_view_model(NEW_NOTE_ID, SavedStateHandle::new());
    let mut effects = vm.take_effects().unwrap();

    vm.on_content_change("content without a title");
    vm.save_note();
    vm.on_title_change(" \t ");
    vm.save_note();
    assert!(effects.try_recv().is_err());
    assert_eq!(module.store().count().await.unwrap(), 0);

    // Only the valid save below produces a write and a navigation signal.
    vm.on_title_change("Now titled");
    vm.save_note();
    assert_eq!(
        timeout(WAIT, effects.recv()).await.unwrap(),
        Some(DetailEffect::NavigateBack)
    );
    assert!(effects.try_recv().is_err());
    assert_eq!(module.store().count().await.unwrap(), 1);
}

#[tokio::test]
async fn restored_drafts_are_not_overwritten_by_the_initial_fetch() {
    let module = AppModule::in_memory().unwrap();
    let id = seed(&module, NEW_NOTE_ID, "Stored title", "Stored content", 5).await;

    let saved_state = SavedStateHandle::new();
    saved_state.set(KEY_DRAFT_TITLE, "Restored title");
    let vm = module.note_detail_view_model(id, saved_state);

    let state = wait_until_ready(&vm).await;
    assert_eq!(state.title, "Restored title");
    // The empty content draft is still seeded from storage.
    assert_eq!(state.content, "Stored content");
    assert_eq!(state.note.map(|note| note.title), Some("Stored title".to_string()));
}

#[tokio::test]
async fn missing_note_leaves_drafts_empty_and_delete_is_a_no_op() {
    let module = AppModule::in_memory().unwrap();
    let vm = module.note_detail_view_model(999, SavedStateHandle::new());
    let mut effects = vm.take_effects().unwrap();

    let state = wait_until_ready(&vm).await;
    assert_eq!(state.phase, DetailPhase::Ready);
    assert_eq!(state.note, None);
    assert!(state.title.is_empty());

    vm.delete_note();
    assert!(effects.try_recv().is_err());
}

#[tokio::test]
async fn deleting_a_loaded_note_removes_it_and_signals_completion() {
    let module = AppModule::in_memory().unwrap();
    let id = seed(&module, NEW_NOTE_ID, "Obsolete", "", 5).await;
    seed(&module, NEW_NOTE_ID, "Survivor", "", 6).await;

    let vm = module.note_detail_view_model(id, SavedStateHandle::new());
    wait_until_ready(&vm).await;
    let mut effects = vm.take_effects().unwrap();

    vm.delete_note();
    assert_eq!(
        timeout(WAIT, effects.recv()).await.unwrap(),
        Some(DetailEffect::NoteDeleted)
    );
    assert!(module.store().get_by_id(id).await.unwrap().is_none());
    assert_eq!(module.store().count().await.unwrap(), 1);
}

/// Repository whose writes always fail, for the storage-error path.
struct FailingRepository {
    attempted: Notify,
}

#[async_trait]
impl NoteRepository for FailingRepository {
    fn get_notes(&self) -> NoteListStream {
        Box::pin(futures::stream::empty::<StorageResult<Vec<Note>>>())
    }

    async fn get_note_by_id(&self, _id: NoteId) -> StorageResult<Option<Note>> {
        Ok(None)
    }

    async fn add_note(&self, _note: &Note) -> StorageResult<NoteId> {
        self.attempted.notify_one();
        Err(StorageError::Worker("disk full".to_string()))
    }

    async fn update_note(&self, _note: &Note) -> StorageResult<()> {
        self.attempted.notify_one();
        Err(StorageError::Worker("disk full".to_string()))
    }

    async fn delete_note(&self, _note: &Note) -> StorageResult<()> {
        Err(StorageError::LockPoisoned)
    }

    async fn delete_all_notes(&self) -> StorageResult<()> {
        Err(StorageError::LockPoisoned)
    }
}

#[tokio::test]
async fn storage_failure_on_save_keeps_drafts_and_does_not_navigate() {
    let repo = Arc::new(FailingRepository {
        attempted: Notify::new(),
    });
    let use_case = NotesUseCase::new(repo.clone());
    let saved_state = SavedStateHandle::new();
    let vm = NoteDetailViewModel::new(NEW_NOTE_ID, use_case, saved_state.clone());
    let mut effects = vm.take_effects().unwrap();

    vm.on_title_change("Unlucky");
    vm.save_note();
    timeout(WAIT, repo.attempted.notified()).await.unwrap();

    assert!(effects.try_recv().is_err());
    assert_eq!(saved_state.get(KEY_DRAFT_TITLE).as_deref(), Some("Unlucky"));
}

/// Repository whose calls block until the test releases them.
struct GatedRepository {
    entered: Notify,
    release: Notify,
}

impl GatedRepository {
    fn new() -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    async fn hold(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[async_trait]
impl NoteRepository for GatedRepository {
    fn get_notes(&self) -> NoteListStream {
        Box::pin(futures::stream::pending::<StorageResult<Vec<Note>>>())
    }

    async fn get_note_by_id(&self, id: NoteId) -> StorageResult<Option<Note>> {
        self.hold().await;
        Ok(Some(Note::with_id(id, "Late", "arrival", 1)))
    }

    async fn add_note(&self, _note: &Note) -> StorageResult<NoteId> {
        self.hold().await;
        Ok(1)
    }

    async fn update_note(&self, _note: &Note) -> StorageResult<()> {
        self.hold().await;
        Ok(())
    }

    async fn delete_note(&self, _note: &Note) -> StorageResult<()> {
        Ok(())
    }

    async fn delete_all_notes(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn dropping_the_state_holder_abandons_the_initial_fetch() {
    let repo = Arc::new(GatedRepository::new());
    let vm = NoteDetailViewModel::new(7, NotesUseCase::new(repo.clone()), SavedStateHandle::new());
    let state = vm.state();
    timeout(WAIT, repo.entered.notified()).await.unwrap();

    drop(vm);
    repo.release.notify_one();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let last = state.borrow().clone();
    assert_eq!(last.phase, DetailPhase::Loading);
    assert_eq!(last.note, None);
    assert!(last.title.is_empty());
}

#[tokio::test]
async fn clearing_the_state_holder_abandons_an_in_flight_save() {
    let repo = Arc::new(GatedRepository::new());
    let saved_state = SavedStateHandle::new();
    let vm = NoteDetailViewModel::new(NEW_NOTE_ID, NotesUseCase::new(repo.clone()), saved_state.clone());
    let mut effects = vm.take_effects().unwrap();

    vm.on_title_change("Draft");
    vm.save_note();
    timeout(WAIT, repo.entered.notified()).await.unwrap();

    vm.clear();
    repo.release.notify_one();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(effects.try_recv().is_err());
    assert_eq!(saved_state.get(KEY_DRAFT_TITLE).as_deref(), Some("Draft"));
}
