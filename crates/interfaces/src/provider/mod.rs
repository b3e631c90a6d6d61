mod error;

pub use error::{ProviderError, ProviderResult};

use strand_primitives::{BlockHash, BlockNumber, BlockWithSenders, ChainInfo};

/// Read access to the tip of the locally accepted chain.
///
/// The engine only ever reads the head, writes happen in the sync pipeline.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait CanonicalHeadProvider: Send + Sync {
    /// Returns the hash and number of the current canonical head.
    fn canonical_head(&self) -> ProviderResult<ChainInfo>;
}

/// Read access to stored blocks.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait BlockReader: Send + Sync {
    /// Returns the block with matching hash and number, along with the sender of every
    /// transaction in the block.
    ///
    /// Returns `None` if block is not found.
    fn block_with_senders(
        &self,
        hash: BlockHash,
        number: BlockNumber,
    ) -> ProviderResult<Option<BlockWithSenders>>;
}
