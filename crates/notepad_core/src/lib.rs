//! Core note collection logic for Notepad.
//! This crate owns every note invariant; UI shells only render `View`s and
//! send operations back.

pub mod config;
pub mod logging;
pub mod model;
pub mod persist;
pub mod storage;
pub mod store;
pub mod view;

pub use config::{ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{FieldParseError, Note, NoteField, NoteId, UNTITLED_LABEL};
pub use persist::{PersistError, PersistStatus};
pub use storage::{JsonFileStorage, MemoryStorage, NoteStorage, StorageError, StorageResult};
pub use store::note_store::NoteStore;
pub use view::{project, EditorPane, Intent, ListItem, View, EMPTY_EDITOR_PLACEHOLDER};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
