//! Single-thread persist worker.
//!
//! The worker owns no note state of its own: the store hands it complete
//! snapshots tagged with a mutation generation. A debounce window opened by
//! the first pending snapshot lets bursts of edits collapse into one write;
//! the window is fixed from its first snapshot, and once it has elapsed the
//! snapshot is written before anything else is received, so continuous
//! typing cannot postpone a write. Without a window the worker only drains
//! what is already queued, up to `MAX_ZERO_WINDOW_COALESCE` snapshots.

use super::{PersistError, PersistStatus};
use crate::model::note::Note;
use crate::storage::NoteStorage;
use log::{debug, error, info, warn};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const WORKER_THREAD_NAME: &str = "notepad-persist";
const MAX_ZERO_WINDOW_COALESCE: usize = 64;

enum WorkerCommand {
    Save { generation: u64, notes: Vec<Note> },
    Flush(Sender<Result<(), PersistError>>),
}

struct Pending {
    generation: u64,
    notes: Vec<Note>,
    opened_at: Instant,
    coalesced: usize,
}

/// What the writer loop does before its next receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Nothing pending; block until a command arrives.
    Block,
    /// Drain already-queued commands without waiting.
    Poll,
    /// Wait at most this long for more snapshots.
    WaitFor(Duration),
    /// Write the pending snapshot before receiving anything.
    WriteNow,
}

fn next_step(pending: Option<&Pending>, debounce: Duration) -> Step {
    let Some(current) = pending else {
        return Step::Block;
    };
    if debounce.is_zero() {
        return if current.coalesced >= MAX_ZERO_WINDOW_COALESCE {
            Step::WriteNow
        } else {
            Step::Poll
        };
    }
    let elapsed = current.opened_at.elapsed();
    if elapsed >= debounce {
        Step::WriteNow
    } else {
        Step::WaitFor(debounce - elapsed)
    }
}

/// Handle to the background writer thread.
///
/// Dropping the handle closes the queue, waits for the last pending
/// snapshot to be written, and joins the thread.
pub struct PersistWorker {
    sender: Option<Sender<WorkerCommand>>,
    status: Arc<Mutex<PersistStatus>>,
    handle: Option<JoinHandle<()>>,
}

impl PersistWorker {
    /// Starts the writer thread for `storage`.
    ///
    /// `debounce` of zero writes each snapshot as soon as the thread is free.
    pub fn spawn(storage: Arc<dyn NoteStorage>, debounce: Duration) -> Result<Self, PersistError> {
        let (sender, receiver) = mpsc::channel();
        let status = Arc::new(Mutex::new(PersistStatus::default()));
        let worker_status = Arc::clone(&status);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run(storage.as_ref(), debounce, receiver, &worker_status))
            .map_err(|err| PersistError::Spawn(err.to_string()))?;

        Ok(Self {
            sender: Some(sender),
            status,
            handle: Some(handle),
        })
    }

    /// Queues a full-collection snapshot. Never blocks on I/O.
    pub fn submit(&self, generation: u64, notes: Vec<Note>) {
        let sent = self
            .sender
            .as_ref()
            .map(|sender| sender.send(WorkerCommand::Save { generation, notes }).is_ok())
            .unwrap_or(false);
        if !sent {
            error!(
                "event=notes_save module=persist status=error generation={} error_code=worker_stopped",
                generation
            );
        }
    }

    /// Blocks until every queued snapshot is written.
    ///
    /// Returns the outcome of the most recent write.
    pub fn flush(&self) -> Result<(), PersistError> {
        let sender = self.sender.as_ref().ok_or(PersistError::WorkerStopped)?;
        let (reply_tx, reply_rx) = mpsc::channel();
        sender
            .send(WorkerCommand::Flush(reply_tx))
            .map_err(|_| PersistError::WorkerStopped)?;
        reply_rx.recv().map_err(|_| PersistError::WorkerStopped)?
    }

    pub fn status(&self) -> PersistStatus {
        lock_status(&self.status).clone()
    }
}

impl Drop for PersistWorker {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=persist_stop module=persist status=error error_code=worker_panicked");
            }
        }
    }
}

fn run(
    storage: &dyn NoteStorage,
    debounce: Duration,
    receiver: Receiver<WorkerCommand>,
    status: &Mutex<PersistStatus>,
) {
    debug!(
        "event=persist_start module=persist status=ok location={} debounce_ms={}",
        storage.location(),
        debounce.as_millis()
    );
    let mut pending: Option<Pending> = None;

    loop {
        let next = match next_step(pending.as_ref(), debounce) {
            Step::Block => match receiver.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
            Step::Poll => match receiver.try_recv() {
                Ok(command) => Some(command),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break,
            },
            Step::WaitFor(wait) => match receiver.recv_timeout(wait) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            Step::WriteNow => None,
        };

        match next {
            Some(WorkerCommand::Save { generation, notes }) => {
                let (opened_at, coalesced) = pending
                    .as_ref()
                    .map(|current| (current.opened_at, current.coalesced + 1))
                    .unwrap_or_else(|| (Instant::now(), 0));
                if let Some(replaced) = pending.as_ref() {
                    debug!(
                        "event=notes_save module=persist status=coalesced replaced_generation={} generation={}",
                        replaced.generation, generation
                    );
                }
                pending = Some(Pending {
                    generation,
                    notes,
                    opened_at,
                    coalesced,
                });
            }
            Some(WorkerCommand::Flush(reply)) => {
                if let Some(current) = pending.take() {
                    write_snapshot(storage, current, status);
                }
                let _ = reply.send(last_outcome(status));
            }
            None => {
                if let Some(current) = pending.take() {
                    write_snapshot(storage, current, status);
                }
            }
        }
    }

    if let Some(current) = pending.take() {
        write_snapshot(storage, current, status);
    }
    debug!("event=persist_stop module=persist status=ok");
}

fn write_snapshot(storage: &dyn NoteStorage, pending: Pending, status: &Mutex<PersistStatus>) {
    let started_at = Instant::now();
    let result = storage.save(&pending.notes);
    let mut current = lock_status(status);
    match result {
        Ok(()) => {
            current.written_generation = pending.generation;
            current.last_error = None;
            info!(
                "event=notes_save module=persist status=ok generation={} count={} duration_ms={}",
                pending.generation,
                pending.notes.len(),
                started_at.elapsed().as_millis()
            );
        }
        Err(err) => {
            current.failed_writes += 1;
            current.last_error = Some(err.to_string());
            error!(
                "event=notes_save module=persist status=error generation={} count={} duration_ms={} error_code=write_failed error={}",
                pending.generation,
                pending.notes.len(),
                started_at.elapsed().as_millis(),
                err
            );
        }
    }
}

fn last_outcome(status: &Mutex<PersistStatus>) -> Result<(), PersistError> {
    match lock_status(status).last_error.as_ref() {
        Some(message) => Err(PersistError::Storage(message.clone())),
        None => Ok(()),
    }
}

fn lock_status(status: &Mutex<PersistStatus>) -> MutexGuard<'_, PersistStatus> {
    status
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
