//! Types used when handing blocks to the sync pipeline.

use strand_primitives::BlockHash;

/// The sync pipeline's verdict on a block the engine forwarded for execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionStatus {
    /// Hash of the block the verdict is about.
    pub block_hash: BlockHash,
    /// Whether executing the block succeeded.
    pub valid: bool,
}

impl ExecutionStatus {
    /// The block was executed successfully.
    pub const fn valid(block_hash: BlockHash) -> Self {
        Self { block_hash, valid: true }
    }

    /// The block failed execution.
    pub const fn invalid(block_hash: BlockHash) -> Self {
        Self { block_hash, valid: false }
    }
}
