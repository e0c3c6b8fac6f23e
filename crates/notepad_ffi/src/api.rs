//! FFI use-case API for the desktop shell.
//!
//! # Responsibility
//! - Expose the note store operations as sync, string-friendly calls.
//! - Own the single process-wide `NoteStore` opened by the shell.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - At most one data directory is opened per process.
//! - String-returning calls return an empty string on success.
//! - A mutating call returns only after its snapshot is on disk, since the
//!   process-wide store is never dropped and cannot flush on exit.

use log::warn;
use notepad_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    EditorPane, NoteField, NoteId, NoteStore, StoreConfig,
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Duration;

static OPEN_STORE: OnceLock<OpenStore> = OnceLock::new();

struct OpenStore {
    data_dir: PathBuf,
    store: Mutex<NoteStore>,
}

impl OpenStore {
    fn lock(&self) -> MutexGuard<'_, NoteStore> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling log files.
/// - Idempotent for the same arguments; returns an error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.trim()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Sidebar row for the notes list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListItemDto {
    pub note_id: String,
    /// Title, or `Untitled` when empty.
    pub label: String,
    pub active: bool,
}

/// Active note bound to the editor pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEditorDto {
    pub note_id: String,
    pub title: String,
    pub content: String,
}

/// Full screen state for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesViewDto {
    pub items: Vec<NoteListItemDto>,
    /// `None` when no note is active; render `placeholder` instead.
    pub editor: Option<NoteEditorDto>,
    pub placeholder: String,
}

/// Result envelope for mutating calls.
///
/// `ok` is false when the operation was rejected or its write failed; in the
/// latter case the in-memory change stands and the next mutation rewrites
/// the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Affected note id, when there is one.
    pub note_id: Option<String>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: Option<String>) -> Self {
        Self {
            ok: true,
            note_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }

    fn write_failed(self, operation: &str, err: impl std::fmt::Display) -> Self {
        Self {
            ok: false,
            note_id: self.note_id,
            message: format!("{operation} applied but not saved: {err}"),
        }
    }
}

/// Opens (or reuses) the note store under `data_dir` and loads it.
///
/// # FFI contract
/// - Sync call; reads `notes.json` once.
/// - Repeated calls with the same directory are no-ops.
/// - A different directory after the first open returns an error message.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_open(data_dir: String) -> String {
    let data_dir = PathBuf::from(data_dir.trim());
    if let Some(existing) = OPEN_STORE.get() {
        return same_dir_or_error(existing, &data_dir);
    }

    let config = match StoreConfig::new(data_dir.clone()) {
        Ok(config) => config.with_write_debounce(Duration::ZERO),
        Err(err) => return format!("notes_open failed: {err}"),
    };
    let store = match NoteStore::open(&config) {
        Ok(store) => store,
        Err(err) => return format!("notes_open failed: {err}"),
    };

    let opened = OpenStore {
        data_dir: data_dir.clone(),
        store: Mutex::new(store),
    };
    if OPEN_STORE.set(opened).is_err() {
        warn!("event=notes_open module=ffi status=race_lost");
    }
    match OPEN_STORE.get() {
        Some(existing) => same_dir_or_error(existing, &data_dir),
        None => "notes_open failed: store unavailable".to_string(),
    }
}

/// Returns the current list and editor projection.
///
/// Before `notes_open`, returns an empty list with the placeholder.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_view() -> NotesViewDto {
    let view = match OPEN_STORE.get() {
        Some(open) => open.lock().view(),
        None => notepad_core::project(&[], None),
    };

    let items = view
        .sidebar
        .into_iter()
        .map(|item| NoteListItemDto {
            note_id: item.id.to_string(),
            label: item.label,
            active: item.active,
        })
        .collect();
    let (editor, placeholder) = match view.editor {
        EditorPane::Editing { id, title, content } => (
            Some(NoteEditorDto {
                note_id: id.to_string(),
                title,
                content,
            }),
            notepad_core::EMPTY_EDITOR_PLACEHOLDER,
        ),
        EditorPane::Empty { placeholder } => (None, placeholder),
    };

    NotesViewDto {
        items,
        editor,
        placeholder: placeholder.to_string(),
    }
}

/// Creates an empty note at the top of the list and selects it.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create() -> NoteActionResponse {
    with_store("note_create", |store| {
        let id = store.create();
        NoteActionResponse::success("Note created.", Some(id.to_string()))
    })
}

/// Marks `note_id` as the active note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_select(note_id: String) -> NoteActionResponse {
    with_store("note_select", |store| {
        store.select(note_id.as_str());
        NoteActionResponse::success("Note selected.", Some(note_id))
    })
}

/// Replaces `field` (`title|content`) of `note_id` with `value`.
///
/// Unknown ids succeed without changes, matching the store contract.
#[flutter_rust_bridge::frb(sync)]
pub fn note_update(note_id: String, field: String, value: String) -> NoteActionResponse {
    let field = match field.parse::<NoteField>() {
        Ok(field) => field,
        Err(err) => return NoteActionResponse::failure(format!("note_update failed: {err}")),
    };
    with_store("note_update", |store| {
        let id = NoteId::from(note_id);
        let message = if store.update(&id, field, value) {
            "Note updated."
        } else {
            "No matching note."
        };
        NoteActionResponse::success(message, Some(id.to_string()))
    })
}

/// Deletes `note_id`; selection moves to the first remaining note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: String) -> NoteActionResponse {
    with_store("note_delete", |store| {
        let id = NoteId::from(note_id);
        let message = if store.delete(&id) {
            "Note deleted."
        } else {
            "No matching note."
        };
        NoteActionResponse::success(message, Some(id.to_string()))
    })
}

/// Waits for pending writes; returns the last write error, if any.
///
/// Intended for app shutdown and "unsaved changes" indicators.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_flush() -> String {
    match OPEN_STORE.get() {
        Some(open) => match open.lock().flush() {
            Ok(()) => String::new(),
            Err(err) => err.to_string(),
        },
        None => String::new(),
    }
}

fn same_dir_or_error(existing: &OpenStore, requested: &Path) -> String {
    if existing.data_dir.as_path() == requested {
        String::new()
    } else {
        format!(
            "notes already opened at `{}`; refusing to switch to `{}`",
            existing.data_dir.display(),
            requested.display()
        )
    }
}

fn with_store(
    operation: &str,
    f: impl FnOnce(&mut NoteStore) -> NoteActionResponse,
) -> NoteActionResponse {
    match OPEN_STORE.get() {
        Some(open) => mutate_and_save(open, operation, f),
        None => NoteActionResponse::failure(format!(
            "{operation} failed: notes store is not open; call notes_open first"
        )),
    }
}

fn mutate_and_save(
    open: &OpenStore,
    operation: &str,
    f: impl FnOnce(&mut NoteStore) -> NoteActionResponse,
) -> NoteActionResponse {
    let mut store = open.lock();
    let response = f(&mut *store);
    match store.flush() {
        Ok(()) => response,
        Err(err) => {
            warn!(
                "event=ffi_write module=ffi status=error operation={} error={}",
                operation, err
            );
            response.write_failed(operation, err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, mutate_and_save, note_create, note_delete, note_select,
        note_update, notes_flush, notes_open, notes_view, ping, NoteActionResponse, OpenStore,
    };
    use notepad_core::{MemoryStorage, NoteField, NoteId, NoteStore, StoreConfig};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/notepad-logs".to_string());
        assert!(error.contains("verbose"));
    }

    #[test]
    fn note_update_rejects_unknown_field_before_touching_store() {
        let response = note_update("any".to_string(), "body".to_string(), "x".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("body"));
    }

    #[test]
    fn open_create_edit_delete_flow() {
        let dir = tempfile::tempdir().expect("temp dir");
        let data_dir = dir.path().to_string_lossy().to_string();

        assert_eq!(notes_open(data_dir.clone()), "");
        assert_eq!(notes_open(data_dir.clone()), "");
        let other = tempfile::tempdir().expect("temp dir");
        assert!(notes_open(other.path().to_string_lossy().to_string()).contains("refusing"));

        let first = note_create();
        assert!(first.ok, "{}", first.message);
        let first_id = first.note_id.expect("created id");
        let second = note_create();
        let second_id = second.note_id.expect("created id");

        let updated = note_update(first_id.clone(), "Title".to_string(), "Plan".to_string());
        assert!(updated.ok, "{}", updated.message);
        let raw = std::fs::read_to_string(dir.path().join("notes.json")).expect("notes file");
        assert!(raw.contains("\"title\":\"Plan\""));
        assert!(note_select(first_id.clone()).ok);

        let view = notes_view();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].note_id, second_id);
        assert_eq!(view.items[0].label, "Untitled");
        assert_eq!(view.items[1].label, "Plan");
        assert!(view.items[1].active);
        assert_eq!(
            view.editor.as_ref().map(|editor| editor.note_id.as_str()),
            Some(first_id.as_str())
        );

        assert!(note_delete(first_id).ok);
        let view = notes_view();
        assert_eq!(view.items.len(), 1);
        assert_eq!(
            view.editor.map(|editor| editor.note_id),
            Some(second_id.clone())
        );

        assert_eq!(notes_flush(), "");
        let raw = std::fs::read_to_string(dir.path().join("notes.json")).expect("notes file");
        assert!(raw.contains(&second_id));
    }

    #[test]
    fn mutations_are_on_disk_when_the_call_returns() {
        let dir = tempfile::tempdir().expect("temp dir");
        // A long window shows the write does not depend on debounce expiry.
        let config = StoreConfig::new(dir.path())
            .expect("config")
            .with_write_debounce(Duration::from_secs(60));
        let open = OpenStore {
            data_dir: dir.path().to_path_buf(),
            store: Mutex::new(NoteStore::open(&config).expect("open store")),
        };

        let created = mutate_and_save(&open, "note_create", |store| {
            let id = store.create();
            NoteActionResponse::success("Note created.", Some(id.to_string()))
        });
        assert!(created.ok, "{}", created.message);
        let id = created.note_id.expect("created id");
        let updated = mutate_and_save(&open, "note_update", |store| {
            store.update(&NoteId::from(id.as_str()), NoteField::Content, "last edit");
            NoteActionResponse::success("Note updated.", Some(id.clone()))
        });
        assert!(updated.ok, "{}", updated.message);

        // `open` is still alive: nothing has been flushed by drop.
        let raw = std::fs::read_to_string(dir.path().join("notes.json")).expect("notes file");
        assert!(raw.contains(&id));
        assert!(raw.contains("last edit"));
        assert!(raw.contains("\"title\":\"Untitled\""));
    }

    #[test]
    fn failed_write_is_reported_in_the_response() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let open = OpenStore {
            data_dir: PathBuf::from("memory"),
            store: Mutex::new(NoteStore::with_storage(storage.clone()).expect("store")),
        };

        let response = mutate_and_save(&open, "note_create", |store| {
            let id = store.create();
            NoteActionResponse::success("Note created.", Some(id.to_string()))
        });
        assert!(!response.ok);
        assert!(response.note_id.is_some());
        assert!(response.message.contains("not saved"));
        assert_eq!(open.lock().len(), 1);
    }
}
