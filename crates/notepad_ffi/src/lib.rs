//! Host-shell bindings for `notepad_core`.

pub mod api;
