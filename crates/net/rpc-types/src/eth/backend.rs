use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the backend interface served to the consensus driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionReply {
    /// Incompatible interface changes.
    pub major: u32,
    /// Backwards compatible additions.
    pub minor: u32,
    /// Fixes.
    pub patch: u32,
}

impl fmt::Display for VersionReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A stored block as served to the consensus driver.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockReply {
    /// RLP encoded block.
    pub block_rlp: Bytes,
    /// The 20 byte sender addresses of the block's transactions, concatenated in order.
    pub senders: Bytes,
}
