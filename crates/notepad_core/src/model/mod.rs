//! Domain model for the note collection.
//!
//! # Responsibility
//! - Define the single `Note` record and its identifier.
//! - Define the editable field selector used by update paths.
//!
//! # Invariants
//! - A `NoteId` is generated once and never reused for another note.
//! - The serialized shape is exactly `{ id, title, content }`.

pub mod note;
