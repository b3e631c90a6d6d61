use strand_primitives::BlockHash;

/// Result alias for [`ProviderError`].
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors returned by the storage layer.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ProviderError {
    /// No canonical head has been written yet.
    #[error("canonical head hash is not set")]
    CanonicalHead,
    /// The canonical head hash has no header number entry.
    #[error("block hash {block_hash} does not exist in the header numbers table")]
    HeaderNumber {
        /// Hash that was looked up.
        block_hash: BlockHash,
    },
    /// The underlying database failed.
    #[error("database error: {0}")]
    Database(String),
}
