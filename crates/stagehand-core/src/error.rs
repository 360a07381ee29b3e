//! Domain error types.

use thiserror::Error;

/// Top-level domain error type shared by the registry and the sequencer.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A partition name outside the fixed set was supplied.
    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    /// A malformed argument: a bad delete selector, a non-container save
    /// payload, an unknown effect style, or an oversized record.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The external key-value store reported an error.
    #[error("store failure: {0}")]
    StoreFailure(String),

    /// No dialogue sequence is registered under the requested key.
    #[error("missing sequence: {0}")]
    MissingSequence(String),

    /// The display target cannot be driven (for example, it was destroyed).
    #[error("invalid display target: {0}")]
    InvalidDisplayTarget(String),

    /// A dialogue catalog document could not be parsed or validated.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A spawned playback task panicked or was aborted by the runtime.
    #[error("playback failed: {0}")]
    PlaybackFailed(String),
}
