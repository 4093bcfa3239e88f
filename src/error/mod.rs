//! # Error Module
//!
//! Error types for the photo triage engine.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Per-item decode failures are not errors** - the session skips the
//!   entry and keeps going; only configuration mistakes abort eagerly
//! - **Include context** - entry names, offending values, what went wrong

use thiserror::Error;

/// Top-level library error
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised when a hasher is configured with invalid parameters.
///
/// These are programmer errors: they abort engine/session construction
/// rather than silently degrading hash quality.
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Invalid hash size: {size} (must be greater than 0)")]
    InvalidHashSize { size: u32 },

    #[error("Invalid DCT block size: {dct_size} (must be in 1..={size})")]
    InvalidDctSize { dct_size: u32, size: u32 },
}

/// Per-entry decode failure reported by the decoder collaborator.
///
/// The streaming session observes this, logs it, and skips the entry.
/// It never aborts a session and is deliberately not part of
/// [`TriageError`].
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Entry '{name}' has no byte payload")]
    EmptyPayload { name: String },

    #[error("Failed to decode entry '{name}': {reason}")]
    DecodeFailed { name: String, reason: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, TriageError>;
