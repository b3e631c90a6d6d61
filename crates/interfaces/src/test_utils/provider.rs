use crate::{
    backend::EthBackend,
    provider::{BlockReader, CanonicalHeadProvider, ProviderError, ProviderResult},
    StrandError, StrandResult,
};
use alloy_primitives::Address;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};
use strand_primitives::{
    BlockHash, BlockNumber, BlockWithSenders, ChainInfo, SealedBlock, SealedHeader,
};

/// Storage stub that serves a settable canonical head and the blocks inserted into it.
#[derive(Debug, Default)]
pub struct TestCanonicalHead {
    head: Mutex<ChainInfo>,
    blocks: Mutex<HashMap<BlockHash, BlockWithSenders>>,
    /// Flag whether head lookups should purposefully fail
    fail_lookup: AtomicBool,
}

impl TestCanonicalHead {
    /// Creates the stub with the given head.
    pub fn new(head: ChainInfo) -> Self {
        Self { head: Mutex::new(head), ..Default::default() }
    }

    /// Creates the stub with the given header as head.
    pub fn with_header(header: &SealedHeader) -> Self {
        Self::new(ChainInfo::new(header.hash(), header.number))
    }

    /// Moves the canonical head.
    pub fn set_head(&self, head: ChainInfo) {
        *self.head.lock() = head;
    }

    /// Stores a block with the given transaction senders.
    pub fn insert_block(&self, block: SealedBlock, senders: Vec<Address>) {
        let hash = block.hash();
        self.blocks.lock().insert(hash, block.unseal().with_senders(senders));
    }

    /// Get the failed lookup flag
    pub fn fail_lookup(&self) -> bool {
        self.fail_lookup.load(Ordering::SeqCst)
    }

    /// Update the lookup flag
    pub fn set_fail_lookup(&self, val: bool) {
        self.fail_lookup.store(val, Ordering::SeqCst)
    }
}

impl CanonicalHeadProvider for TestCanonicalHead {
    fn canonical_head(&self) -> ProviderResult<ChainInfo> {
        if self.fail_lookup() {
            return Err(ProviderError::CanonicalHead)
        }
        Ok(*self.head.lock())
    }
}

impl BlockReader for TestCanonicalHead {
    fn block_with_senders(
        &self,
        hash: BlockHash,
        number: BlockNumber,
    ) -> ProviderResult<Option<BlockWithSenders>> {
        if self.fail_lookup() {
            return Err(ProviderError::Database("block lookup failed".into()))
        }
        Ok(self.blocks.lock().get(&hash).filter(|block| block.block.number == number).cloned())
    }
}

/// Node backend stub with fixed answers.
#[derive(Debug, Clone, Default)]
pub struct TestEthBackend {
    /// Returned by [`EthBackend::etherbase`], `None` makes the call fail.
    pub etherbase: Option<Address>,
    /// Returned by [`EthBackend::net_version`].
    pub net_version: u64,
    /// Returned by [`EthBackend::net_peer_count`].
    pub peer_count: u64,
}

impl EthBackend for TestEthBackend {
    fn etherbase(&self) -> StrandResult<Address> {
        self.etherbase
            .ok_or_else(|| StrandError::Custom("etherbase must be explicitly specified".into()))
    }

    fn net_version(&self) -> StrandResult<u64> {
        Ok(self.net_version)
    }

    fn net_peer_count(&self) -> StrandResult<u64> {
        Ok(self.peer_count)
    }
}
