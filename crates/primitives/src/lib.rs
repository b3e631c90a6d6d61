#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! Commonly used types in strand.
//!
//! This crate contains the Ethereum primitive types the engine bridge needs to turn an execution
//! payload back into a block: the post-merge [`Header`], its sealed variants, the ordered trie
//! commitment over transactions and the transaction decoding primitive.

mod block;
mod chain;
pub mod constants;
mod header;
mod transaction;

/// Helper function for calculating Merkle proofs and hashes
pub mod proofs;

pub use block::{Block, BlockWithSenders, SealedBlock};
pub use chain::ChainInfo;
pub use constants::{
    EMPTY_OMMER_ROOT, EMPTY_ROOT, MAXIMUM_EXTRA_DATA_SIZE, SERENITY_DIFFICULTY, SERENITY_NONCE,
};
pub use header::{Header, SealedHeader};
pub use transaction::{
    decode_enveloped, encode_enveloped, TransactionDecodeError, TransactionSigned,
};

/// A block hash.
pub type BlockHash = B256;
/// A block number.
pub type BlockNumber = u64;
/// A transaction hash is a keccak hash of an EIP-2718 encoded signed transaction.
pub type TxHash = B256;

pub use alloy_primitives::{
    b256, hex, keccak256, Address, Bloom, Bytes, FixedBytes, B256, B64, U256,
};

#[doc(hidden)]
mod __reexport {
    pub use alloy_rlp;
    pub use bytes;
}

// Useful reexports
pub use __reexport::*;
