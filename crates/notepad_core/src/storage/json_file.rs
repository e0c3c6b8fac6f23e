//! File-backed storage adapter (`notes.json`).
//!
//! # Responsibility
//! - Read and replace the single JSON file under the data directory.
//!
//! # Invariants
//! - Writes go to a sibling temp file renamed over the target, so readers
//!   see either the previous or the new array.
//! - A missing file is reported as "nothing persisted", not an error.

use super::{decode_notes, encode_notes, NoteStorage, StorageResult};
use crate::model::note::Note;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const TEMP_SUFFIX: &str = "tmp";

/// JSON file storage at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|value| value.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(TEMP_SUFFIX);
        self.path.with_file_name(name)
    }
}

impl NoteStorage for JsonFileStorage {
    fn load(&self) -> StorageResult<Option<Vec<Note>>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        decode_notes(&raw).map(Some)
    }

    fn save(&self, notes: &[Note]) -> StorageResult<()> {
        let raw = encode_notes(notes)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(raw.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
