//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its stable identifier.
//! - Provide display helpers shared by list and editor projections.
//!
//! # Invariants
//! - `id` is immutable after creation.
//! - New notes are stored with the title `Untitled`.
//! - A title the user cleared stays empty on disk and renders as `Untitled`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Label shown for notes whose title is empty.
pub const UNTITLED_LABEL: &str = "Untitled";

/// Opaque note identifier.
///
/// Stored as a plain string so files written by other tools (or older
/// builds) load without requiring UUID syntax.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Note {
    /// Creates a note titled `Untitled` with a generated id and empty body.
    pub fn new() -> Self {
        let mut note = Self::with_id(NoteId::generate());
        note.title = UNTITLED_LABEL.to_string();
        note
    }

    /// Creates a note with a caller-provided id and empty fields.
    pub fn with_id(id: NoteId) -> Self {
        Self {
            id,
            title: String::new(),
            content: String::new(),
        }
    }

    /// Title used by list rendering; falls back to `Untitled`.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_LABEL
        } else {
            self.title.as_str()
        }
    }

    /// Replaces one editable field.
    pub fn set_field(&mut self, field: NoteField, value: impl Into<String>) {
        match field {
            NoteField::Title => self.title = value.into(),
            NoteField::Content => self.content = value.into(),
        }
    }

    pub fn field(&self, field: NoteField) -> &str {
        match field {
            NoteField::Title => &self.title,
            NoteField::Content => &self.content,
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

/// Editable note field selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteField {
    Title,
    Content,
}

impl NoteField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
        }
    }
}

impl Display for NoteField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name did not match `title` or `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldParseError(pub String);

impl Display for FieldParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown note field `{}`; expected title|content", self.0)
    }
}

impl Error for FieldParseError {}

impl FromStr for NoteField {
    type Err = FieldParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            other => Err(FieldParseError(other.to_string())),
        }
    }
}
