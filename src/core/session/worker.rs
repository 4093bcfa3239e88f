//! Single-consumer worker thread around a [`TriageSession`].
//!
//! Callers that produce entries from several threads still need strict
//! in-order processing and exact batch boundaries. The worker realizes that
//! with an explicit command queue drained by one thread that owns the
//! session; entry payloads move into the queue and are dropped with it.

use crossbeam_channel::{unbounded, Sender};
use std::thread::{self, JoinHandle};

use super::{MediaEntry, TriageConfig, TriageSession};
use crate::error::TriageError;
use crate::events::SnapshotSender;

enum Command {
    Add(MediaEntry),
    Close,
}

/// Handle to a worker thread draining entries into a session.
///
/// Entries are processed in the order they were pushed onto the queue.
/// Closing (or dropping) the handle drains everything still queued before
/// the final snapshot is emitted; early termination is "stop pushing, then
/// close", never abort-in-place.
pub struct TriageWorker {
    commands: Sender<Command>,
    handle: Option<JoinHandle<()>>,
}

impl TriageWorker {
    /// Validate the configuration and start the worker thread.
    pub fn spawn(config: TriageConfig, events: SnapshotSender) -> Result<Self, TriageError> {
        // Construct the session here so configuration errors surface to the
        // caller instead of dying inside the thread.
        let mut session = TriageSession::new(config, events)?;

        let (commands, queue) = unbounded();
        let handle = thread::spawn(move || {
            for command in queue {
                match command {
                    Command::Add(mut entry) => session.add(&mut entry),
                    Command::Close => break,
                }
            }
            session.close();
        });

        Ok(Self {
            commands,
            handle: Some(handle),
        })
    }

    /// Queue one entry. Returns immediately; processing order is the push
    /// order.
    pub fn push(&self, entry: MediaEntry) {
        let _ = self.commands.send(Command::Add(entry));
    }

    /// Drain the queue, emit any final snapshot, and wait for the thread.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.commands.send(Command::Close);
            let _ = handle.join();
        }
    }
}

impl Drop for TriageWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
