use crate::{BlockHash, BlockNumber};

/// Current status of the blockchain's head.
#[derive(Default, Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChainInfo {
    /// The block hash of the highest fully synced block.
    pub best_hash: BlockHash,
    /// The block number of the highest fully synced block.
    pub best_number: BlockNumber,
}

impl ChainInfo {
    /// Creates the chain info for the given head.
    pub const fn new(best_hash: BlockHash, best_number: BlockNumber) -> Self {
        Self { best_hash, best_number }
    }
}
