use crate::StrandResult;
use alloy_primitives::Address;

/// Node level information served to the consensus driver next to the engine API.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait EthBackend: Send + Sync {
    /// The address block rewards are credited to when this node builds blocks.
    fn etherbase(&self) -> StrandResult<Address>;

    /// The network id of the chain.
    fn net_version(&self) -> StrandResult<u64>;

    /// The number of connected peers.
    fn net_peer_count(&self) -> StrandResult<u64>;
}
