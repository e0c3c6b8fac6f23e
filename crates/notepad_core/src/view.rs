//! Pure view projection for host UI shells.
//!
//! # Responsibility
//! - Map (collection, selection) to what the sidebar and editor display.
//! - Define the intents a view may emit back into the store.
//!
//! # Invariants
//! - Projection has no side effects and reads no state besides its inputs.
//! - An unmatched selection renders as the empty editor.

use crate::model::note::{Note, NoteField, NoteId};

/// Editor text shown when no note is active.
pub const EMPTY_EDITOR_PLACEHOLDER: &str = "Create or select a note";

/// One sidebar row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: NoteId,
    /// Title, or `Untitled` for an empty title.
    pub label: String,
    pub active: bool,
}

/// Editor pane state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorPane {
    Empty {
        placeholder: &'static str,
    },
    Editing {
        id: NoteId,
        title: String,
        content: String,
    },
}

/// Full screen projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub sidebar: Vec<ListItem>,
    pub editor: EditorPane,
}

/// User action emitted by the view, applied via `NoteStore::apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Create,
    Select(NoteId),
    Update {
        id: NoteId,
        field: NoteField,
        value: String,
    },
    Delete(NoteId),
}

/// Projects the collection and selection into a `View`.
pub fn project(notes: &[Note], selection: Option<&NoteId>) -> View {
    let sidebar = notes
        .iter()
        .map(|note| ListItem {
            id: note.id.clone(),
            label: note.display_title().to_string(),
            active: selection == Some(&note.id),
        })
        .collect();

    let editor = selection
        .and_then(|id| notes.iter().find(|note| &note.id == id))
        .map(|note| EditorPane::Editing {
            id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
        })
        .unwrap_or(EditorPane::Empty {
            placeholder: EMPTY_EDITOR_PLACEHOLDER,
        });

    View { sidebar, editor }
}
