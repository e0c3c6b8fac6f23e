//! Durable storage contracts for the note collection.
//!
//! # Responsibility
//! - Define the whole-collection `load`/`save` contract used by the store.
//! - Own the JSON array wire format shared by every adapter.
//!
//! # Invariants
//! - `save` replaces the full collection; there are no partial writes.
//! - `load` returns `Ok(None)` when nothing has been persisted yet.

use crate::model::note::Note;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage adapter failure.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "note storage io error: {err}"),
            Self::Json(err) => write!(f, "note storage format error: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Whole-collection persistence backend.
///
/// Implementations are shared between the store (reads at startup) and the
/// persist worker thread (writes), hence `Send + Sync`.
pub trait NoteStorage: Send + Sync {
    /// Reads the full persisted collection, or `None` when absent.
    fn load(&self) -> StorageResult<Option<Vec<Note>>>;
    /// Replaces the persisted collection with `notes`.
    fn save(&self, notes: &[Note]) -> StorageResult<()>;
    /// Short location label used in log events.
    fn location(&self) -> String;
}

/// Encodes notes as a compact JSON array.
pub fn encode_notes(notes: &[Note]) -> StorageResult<String> {
    Ok(serde_json::to_string(notes)?)
}

/// Decodes a JSON array of notes.
pub fn decode_notes(raw: &str) -> StorageResult<Vec<Note>> {
    Ok(serde_json::from_str(raw)?)
}
