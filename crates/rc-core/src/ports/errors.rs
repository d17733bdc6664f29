use thiserror::Error;

/// Failure of a remote key-value store round-trip.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never completed or was rejected by the remote side.
    #[error("storage transport failed: {0}")]
    Transport(String),

    #[error("storage io failed: {0}")]
    Io(String),

    /// The store's own container could not be read back.
    #[error("storage data corrupt: {0}")]
    Corrupt(String),
}
