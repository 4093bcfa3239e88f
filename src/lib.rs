//! # Photo Triage
//!
//! Classifies a batch of in-memory photos into duplicate, similar, blurry,
//! screenshot, video and uncategorized groups, streaming aggregate
//! snapshots back while the batch is processed.
//!
//! ## Core Philosophy
//! - **On-device** - suggestions are computed locally, no server round-trip
//! - **Best effort** - an unreadable photo is skipped, never fatal
//! - **Deterministic** - same entries in the same order, same snapshots
//!
//! ## Architecture
//! The library is split into an engine and delivery layers:
//! - `core` - hashing, sharpness, clustering, aggregation, sessions
//! - `events` - channel-based snapshot delivery (GUI-ready)
//! - `error` - error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, TriageError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
