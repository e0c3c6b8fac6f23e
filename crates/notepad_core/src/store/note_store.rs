//! Note store implementation.
//!
//! # Responsibility
//! - Own the newest-first note collection and the active-note selection.
//! - Restore state best-effort at startup and persist after mutations.
//!
//! # Invariants
//! - `create` prepends; every other operation preserves relative order.
//! - Operations on unknown ids are no-ops and do not write.
//! - Deleting the selected note selects the first remaining note, or none.
//!
//! # See also
//! - `crate::persist` for write ordering and coalescing.

use crate::config::StoreConfig;
use crate::model::note::{Note, NoteField, NoteId};
use crate::persist::{PersistError, PersistStatus, PersistWorker};
use crate::storage::{JsonFileStorage, NoteStorage};
use crate::view::{project, Intent, View};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// In-memory note collection with write-behind persistence.
pub struct NoteStore {
    notes: Vec<Note>,
    selection: Option<NoteId>,
    storage: Arc<dyn NoteStorage>,
    writer: PersistWorker,
    generation: u64,
}

impl NoteStore {
    /// Creates an empty store over `storage`.
    ///
    /// Nothing is read until `load` is called.
    pub fn new(
        storage: Arc<dyn NoteStorage>,
        write_debounce: Duration,
    ) -> Result<Self, PersistError> {
        let writer = PersistWorker::spawn(Arc::clone(&storage), write_debounce)?;
        Ok(Self {
            notes: Vec::new(),
            selection: None,
            storage,
            writer,
            generation: 0,
        })
    }

    /// Creates an empty store that writes each snapshot without debounce.
    pub fn with_storage(storage: impl NoteStorage + 'static) -> Result<Self, PersistError> {
        Self::new(Arc::new(storage), Duration::ZERO)
    }

    /// Opens the JSON file described by `config` and loads it.
    pub fn open(config: &StoreConfig) -> Result<Self, PersistError> {
        let storage = JsonFileStorage::new(config.store_path());
        let mut store = Self::new(Arc::new(storage), config.write_debounce)?;
        store.load();
        Ok(store)
    }

    /// Replaces in-memory state with the persisted collection.
    ///
    /// Missing or unreadable state yields an empty collection. Queued writes
    /// are flushed first so the read observes them. Returns the number of
    /// notes restored.
    pub fn load(&mut self) -> usize {
        if let Err(err) = self.writer.flush() {
            debug!(
                "event=notes_load module=store status=start pending_write_error={}",
                err
            );
        }

        let location = self.storage.location();
        let (notes, source) = match self.storage.load() {
            Ok(Some(notes)) => (dedupe_ids(notes), Some("file")),
            Ok(None) => (Vec::new(), Some("absent")),
            Err(err) => {
                warn!(
                    "event=notes_load module=store status=error location={} error_code=load_failed recovered=empty error={}",
                    location, err
                );
                (Vec::new(), None)
            }
        };

        self.notes = notes;
        self.selection = self.notes.first().map(|note| note.id.clone());
        if let Some(source) = source {
            info!(
                "event=notes_load module=store status=ok source={} location={} count={}",
                source,
                location,
                self.notes.len()
            );
        }
        self.notes.len()
    }

    /// Prepends a new `Untitled` note with an empty body and selects it.
    pub fn create(&mut self) -> NoteId {
        let note = Note::new();
        let id = note.id.clone();
        self.notes.insert(0, note);
        self.selection = Some(id.clone());
        debug!("event=note_create module=store status=ok note_id={}", id);
        self.persist();
        id
    }

    /// Sets the active note without checking membership.
    pub fn select(&mut self, id: impl Into<NoteId>) {
        self.selection = Some(id.into());
    }

    /// Replaces `field` of the note with `id`.
    ///
    /// Returns `false` (and writes nothing) when no note matches.
    pub fn update(&mut self, id: &NoteId, field: NoteField, value: impl Into<String>) -> bool {
        let Some(note) = self.notes.iter_mut().find(|note| &note.id == id) else {
            debug!(
                "event=note_update module=store status=skipped note_id={} reason=unknown_id",
                id
            );
            return false;
        };
        note.set_field(field, value);
        debug!(
            "event=note_update module=store status=ok note_id={} field={}",
            id, field
        );
        self.persist();
        true
    }

    /// Removes the note with `id`, repairing selection if it pointed there.
    ///
    /// Returns `false` (and writes nothing) when no note matches.
    pub fn delete(&mut self, id: &NoteId) -> bool {
        let Some(index) = self.notes.iter().position(|note| &note.id == id) else {
            debug!(
                "event=note_delete module=store status=skipped note_id={} reason=unknown_id",
                id
            );
            return false;
        };
        self.notes.remove(index);
        if self.selection.as_ref() == Some(id) {
            self.selection = self.notes.first().map(|note| note.id.clone());
        }
        debug!(
            "event=note_delete module=store status=ok note_id={} remaining={}",
            id,
            self.notes.len()
        );
        self.persist();
        true
    }

    /// Dispatches a view intent to the matching operation.
    ///
    /// Returns whether collection or selection changed.
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Create => {
                self.create();
                true
            }
            Intent::Select(id) => {
                let changed = self.selection.as_ref() != Some(&id);
                self.select(id);
                changed
            }
            Intent::Update { id, field, value } => self.update(&id, field, value),
            Intent::Delete(id) => self.delete(&id),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selection(&self) -> Option<&NoteId> {
        self.selection.as_ref()
    }

    /// The selected note, or `None` when selection is unset or unmatched.
    pub fn active_note(&self) -> Option<&Note> {
        self.selection.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Projects current state for rendering.
    pub fn view(&self) -> View {
        project(&self.notes, self.selection.as_ref())
    }

    /// Number of mutations applied since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits for queued writes and returns the latest write outcome.
    pub fn flush(&self) -> Result<(), PersistError> {
        self.writer.flush()
    }

    pub fn persist_status(&self) -> PersistStatus {
        self.writer.status()
    }

    fn persist(&mut self) {
        self.generation += 1;
        self.writer.submit(self.generation, self.notes.clone());
    }
}

fn dedupe_ids(notes: Vec<Note>) -> Vec<Note> {
    let total = notes.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<Note> = notes
        .into_iter()
        .filter(|note| seen.insert(note.id.clone()))
        .collect();
    if unique.len() != total {
        warn!(
            "event=notes_load module=store status=repaired dropped_duplicates={}",
            total - unique.len()
        );
    }
    unique
}
