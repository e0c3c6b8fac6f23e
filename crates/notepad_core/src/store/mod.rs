//! Note store: the single owner of collection and selection state.
//!
//! # Responsibility
//! - Apply create/select/update/delete to the in-memory collection.
//! - Hand a full snapshot to the persist worker after every mutation.
//!
//! # Invariants
//! - Note ids in the collection are pairwise distinct.
//! - Selection, when set by the store itself, references a present note.
//! - Selection changes alone are never persisted.

pub mod note_store;
