// nfc-relay/src/worker/mod.rs

//! The two relay worker state machines. One unit runs exactly one of
//! them: the reader-side worker against a real card, or the card-side
//! worker emulating that card toward a real reader.

pub mod card;
pub mod reader;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

use derive_more::Display;
use log::warn;

pub use card::CardWorker;
pub use reader::ReaderWorker;

/// Reader-side worker states.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Announced Role=Reader, waiting for the peer's pong.
    WaitPong,
    /// Polling the physical reader for a nearby card.
    CardSearch,
    /// Card found and descriptor shipped; forwarding APDUs interactively.
    CardFound,
}

/// Card-side worker states.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// Announced Role=Card, waiting for the peer's pong.
    WaitPong,
    /// Waiting for the peer's device descriptor.
    WaitDescriptor,
    /// Emulating; waiting for the real reader's next I-block.
    WaitApduRequest,
    /// Request forwarded; stalling the real reader until the peer answers.
    WaitApduResponse,
    /// Answer buffered; delivering it on the next WTX acknowledgment.
    GetApduResponse,
}

/// Snapshot published to the UI collaborator. Read-only outside the
/// owning worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Reader-side worker state.
    Reader(ReaderState),
    /// Card-side worker state.
    Card(CardState),
}

/// Running worker thread. Dropping the handle stops and joins the worker;
/// the worker tears down its relay link (and transport channel) on exit,
/// so no detached state survives shutdown.
pub struct WorkerHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub(crate) fn new(running: Arc<AtomicBool>, thread: JoinHandle<()>) -> Self {
        Self {
            running,
            thread: Some(thread),
        }
    }

    /// Mark the worker non-running and join its thread.
    pub fn stop(mut self) {
        self.stop_inner();
    }

    /// Whether the worker loop is still marked running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn stop_inner(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("worker thread panicked during shutdown");
            }
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.stop_inner();
    }
}

/// Publishes state transitions to the UI channel, suppressing repeats.
/// The worker remains the only writer of the state value itself.
pub(crate) struct StatePublisher {
    tx: Sender<WorkerState>,
    last: Option<WorkerState>,
}

impl StatePublisher {
    pub(crate) fn new(tx: Sender<WorkerState>) -> Self {
        Self { tx, last: None }
    }

    pub(crate) fn publish(&mut self, state: WorkerState) {
        if self.last != Some(state) {
            self.last = Some(state);
            // UI side may have hung up; that never stops the worker
            let _ = self.tx.send(state);
        }
    }
}
