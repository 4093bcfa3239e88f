//! Snapshot channel implementation using crossbeam-channel.
//!
//! Provides a thread-safe way to hand classification snapshots from the
//! engine to any UI layer.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::core::aggregator::ClassificationSnapshot;

/// Sends snapshots from the engine.
///
/// A thin wrapper around crossbeam's Sender that can be cloned and sent
/// across threads.
#[derive(Clone)]
pub struct SnapshotSender {
    inner: Sender<ClassificationSnapshot>,
}

impl SnapshotSender {
    /// Send a snapshot.
    ///
    /// If the receiver is dropped, the snapshot is silently discarded so
    /// progress reporting stays optional. On a bounded channel this blocks
    /// while the buffer is full, which throttles the producer without
    /// disturbing its batch counting.
    pub fn send(&self, snapshot: ClassificationSnapshot) {
        let _ = self.inner.send(snapshot);
    }
}

/// Receives snapshots from the engine.
pub struct SnapshotReceiver {
    inner: Receiver<ClassificationSnapshot>,
}

impl SnapshotReceiver {
    /// Block until the next snapshot arrives.
    pub fn recv(&self) -> Option<ClassificationSnapshot> {
        self.inner.recv().ok()
    }

    /// Take the next snapshot without blocking.
    pub fn try_recv(&self) -> Option<ClassificationSnapshot> {
        self.inner.try_recv().ok()
    }

    /// Iterate over snapshots until every sender is gone.
    pub fn iter(&self) -> impl Iterator<Item = ClassificationSnapshot> + '_ {
        self.inner.iter()
    }
}

/// Create an unbounded snapshot channel.
///
/// The default choice: snapshots are small and consumers are rarely slower
/// than the hashing work feeding them.
pub fn snapshot_channel() -> (SnapshotSender, SnapshotReceiver) {
    let (sender, receiver) = unbounded();
    (
        SnapshotSender { inner: sender },
        SnapshotReceiver { inner: receiver },
    )
}

/// Create a bounded snapshot channel with the given capacity.
///
/// Use this when the consumer needs backpressure (e.g. a UI that renders
/// every snapshot).
pub fn snapshot_channel_bounded(capacity: usize) -> (SnapshotSender, SnapshotReceiver) {
    let (sender, receiver) = bounded(capacity);
    (
        SnapshotSender { inner: sender },
        SnapshotReceiver { inner: receiver },
    )
}

/// A sender with no receiver, for headless runs and tests that only care
/// about final state.
pub fn null_sender() -> SnapshotSender {
    let (sender, _receiver) = snapshot_channel();
    sender
}
