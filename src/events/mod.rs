//! # Events Module
//!
//! Snapshot delivery from the triage engine to any UI layer.
//!
//! The engine emits [`ClassificationSnapshot`] values through a channel as
//! processing advances; a UI (or test) drains them at its own pace. Emission
//! order is preserved end to end.
//!
//! [`ClassificationSnapshot`]: crate::core::aggregator::ClassificationSnapshot

mod channel;

pub use channel::{null_sender, snapshot_channel, snapshot_channel_bounded, SnapshotReceiver, SnapshotSender};
