use std::fmt;
use strand_interfaces::{provider::ProviderError, StrandError};
use strand_primitives::{BlockNumber, Bytes, TransactionDecodeError, B256};
use thiserror::Error;

/// The Engine API result type
pub type EngineApiResult<Ok> = Result<Ok, EngineApiError>;

/// Error returned by [`EngineApi`][crate::engine::EngineApi]
#[derive(Error, Debug)]
pub enum EngineApiError {
    /// No terminal total difficulty is configured.
    #[error("not a proof-of-stake chain")]
    NotPostMerge,
    /// A mandatory payload field is absent.
    #[error("invalid execution payload: missing {field}")]
    InvalidPayload {
        /// Wire name of the missing field.
        field: &'static str,
    },
    /// Invalid payload extra data.
    #[error("Invalid payload extra data: {0}")]
    PayloadExtraData(Bytes),
    /// A payload transaction could not be decoded.
    #[error("Invalid payload transaction at index {index}: {source}")]
    MalformedTransaction {
        /// Position of the transaction in the payload.
        index: usize,
        /// The decoding failure.
        #[source]
        source: TransactionDecodeError,
    },
    /// Invalid payload block hash.
    #[error("Invalid payload block hash. Computed: {computed}. Expected: {expected}")]
    HashMismatch {
        /// The block hash computed from the payload.
        computed: B256,
        /// The block hash provided with the payload.
        expected: B256,
    },
    /// The canonical head could not be read.
    #[error("cannot find latest block: {0}")]
    HeadUnavailable(#[source] ProviderError),
    /// Unknown payload requested.
    #[error("Unknown payload")]
    UnknownPayload,
    /// No stored block matches the requested hash and number.
    #[error("block {number} with hash {hash} not found")]
    UnknownBlock {
        /// Requested block hash.
        hash: B256,
        /// Requested block number.
        number: BlockNumber,
    },
    /// A stored block could not be read.
    #[error("cannot read block: {0}")]
    BlockUnavailable(#[source] ProviderError),
    /// A blocking wait was interrupted.
    #[error("{0}")]
    Cancelled(CancelReason),
    /// The sync pipeline dropped its end of the coordination channels.
    #[error("sync pipeline is not running")]
    SyncPipelineClosed,
    /// The node backend failed.
    #[error(transparent)]
    Backend(#[from] StrandError),
}

/// Why a blocking wait was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller cancelled its request.
    Caller,
    /// The node is shutting down.
    Shutdown,
    /// The sync pipeline did not answer in time.
    Timeout,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Caller => f.write_str("request cancelled"),
            Self::Shutdown => f.write_str("node is shutting down"),
            Self::Timeout => f.write_str("timed out waiting for the sync pipeline"),
        }
    }
}
