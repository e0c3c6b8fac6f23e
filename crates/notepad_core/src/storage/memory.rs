//! In-process storage adapter.
//!
//! Holds the encoded JSON array in memory so callers can embed the store
//! without a file system and tests can inspect exactly what was written.
//! Clones share the same backing slot.

use super::{decode_notes, encode_notes, NoteStorage, StorageError, StorageResult};
use crate::model::note::Note;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemorySlot {
    raw: Option<String>,
    fail_writes: bool,
    writes: usize,
}

/// Shared in-memory JSON slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with raw (possibly malformed) persisted text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.lock().raw = Some(raw.into());
        storage
    }

    /// Returns the last written raw JSON, if any.
    pub fn raw(&self) -> Option<String> {
        self.lock().raw.clone()
    }

    /// Decodes the current slot contents.
    pub fn snapshot(&self) -> StorageResult<Option<Vec<Note>>> {
        self.lock().raw.as_deref().map(decode_notes).transpose()
    }

    /// Makes subsequent `save` calls fail with a permission-denied io error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MemorySlot> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NoteStorage for MemoryStorage {
    fn load(&self) -> StorageResult<Option<Vec<Note>>> {
        self.snapshot()
    }

    fn save(&self, notes: &[Note]) -> StorageResult<()> {
        let raw = encode_notes(notes)?;
        let mut slot = self.lock();
        if slot.fail_writes {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "writes disabled",
            )));
        }
        slot.raw = Some(raw);
        slot.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
