//! Write-behind persistence for the note collection.
//!
//! # Responsibility
//! - Move full-collection writes off the caller's thread.
//! - Report write outcomes without ever failing a store operation.
//!
//! # Invariants
//! - Snapshots are written in issue order by a single writer thread.
//! - Queued snapshots are coalesced; only the newest one is written.
//! - A snapshot older than one already written is never written.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod worker;

pub use worker::PersistWorker;

/// Outcome counters reported by the persist worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistStatus {
    /// Mutation generation of the last successfully written snapshot.
    pub written_generation: u64,
    /// Total number of failed writes since start.
    pub failed_writes: u64,
    /// Error message of the most recent write, cleared by the next success.
    pub last_error: Option<String>,
}

/// Persistence failure observed through `flush`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// The most recent write failed in the storage adapter.
    Storage(String),
    /// The writer thread could not be started.
    Spawn(String),
    /// The writer thread is gone; queued snapshots may be lost.
    WorkerStopped,
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(message) => write!(f, "note write failed: {message}"),
            Self::Spawn(message) => write!(f, "failed to start note writer: {message}"),
            Self::WorkerStopped => write!(f, "note writer is not running"),
        }
    }
}

impl Error for PersistError {}
