/// Result alias for [`StrandError`].
pub type StrandResult<T> = Result<T, StrandError>;

/// Core error variants possible when interacting with the node.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum StrandError {
    /// Storage lookup failed.
    #[error(transparent)]
    Provider(#[from] crate::provider::ProviderError),

    /// Any other failure reported by a collaborator.
    #[error("{0}")]
    Custom(String),
}
