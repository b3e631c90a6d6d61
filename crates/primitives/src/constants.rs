//! Ethereum protocol-related constants

use alloy_primitives::{b256, B256, B64, U256};

/// Keccak-256 hash of the RLP of an empty list, KEC("\xc0").
///
/// Every post-merge header carries it as its ommers hash.
pub const EMPTY_OMMER_ROOT: B256 =
    b256!("1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347");

/// Root hash of an empty trie.
pub const EMPTY_ROOT: B256 =
    b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");

/// Difficulty of every block produced under proof-of-stake.
///
/// See [EIP-3675](https://eips.ethereum.org/EIPS/eip-3675#replacing-difficulty-with-0).
pub const SERENITY_DIFFICULTY: U256 = U256::ZERO;

/// Nonce of every block produced under proof-of-stake.
///
/// See [EIP-3675](https://eips.ethereum.org/EIPS/eip-3675#replacing-block-fields).
pub const SERENITY_NONCE: B64 = B64::ZERO;

/// Maximum size of the header extra data accepted from an execution payload.
pub const MAXIMUM_EXTRA_DATA_SIZE: usize = 32;
