//! Error types shared between the store core and its adapters.
//!
//! The `StoreError` enum unifies common failure cases for storage I/O,
//! serialization, validation, and remote reconciliation, allowing crates to
//! propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by the store core and its adapters.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error originating from the standard library or the file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Persisted state was present but could not be decoded into a quote list.
    #[error("Corrupt persisted state: {0}")]
    CorruptState(String),

    /// The backing store rejected a write; in-memory state is kept as-is.
    #[error("Storage write rejected: {0}")]
    StorageWrite(String),

    /// A caller-supplied field failed validation; no state was mutated.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An imported snapshot did not have the expected top-level shape.
    #[error("Import format error: {0}")]
    ImportFormat(String),

    /// The remote source could not be reached or returned an unusable payload.
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Crossbeam/channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(err: PoisonError<T>) -> Self {
        StoreError::MutexLock(err.to_string())
    }
}
