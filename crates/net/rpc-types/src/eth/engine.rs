//! Engine API types exchanged with the consensus driver, following
//! <https://github.com/ethereum/execution-apis/blob/main/src/engine/paris.md> and
//! [EIP-3675](https://eips.ethereum.org/EIPS/eip-3675).

use alloy_primitives::{Address, Bloom, Bytes, B256, B64, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use strand_primitives::{encode_enveloped, SealedBlock};

/// An 8-byte identifier for an execution payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayloadId(B64);

// === impl PayloadId ===

impl PayloadId {
    /// Creates a new payload id from the given identifier.
    pub const fn new(id: [u8; 8]) -> Self {
        Self(B64::new(id))
    }
}

impl From<u64> for PayloadId {
    fn from(id: u64) -> Self {
        Self::new(id.to_be_bytes())
    }
}

impl fmt::Display for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The candidate block handed over by the consensus driver.
///
/// Hash, address and root fields are optional on the wire: a payload missing any of them is
/// rejected before it is processed.
///
/// See also: <https://github.com/ethereum/execution-apis/blob/main/src/engine/paris.md#executionpayloadv1>
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayload {
    /// Hash of the parent block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_hash: Option<B256>,
    /// Hash the driver expects the reconstructed header to have.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<B256>,
    /// Fee recipient of the block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<Address>,
    /// State root after executing the block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_root: Option<B256>,
    /// Receipts root of the block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_root: Option<B256>,
    /// Logs bloom of the block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_bloom: Option<Bloom>,
    /// Randomness seed of the slot (`prevRandao`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random: Option<B256>,
    /// Up to 32 bytes of extra data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<Bytes>,
    /// EIP-1559 base fee, absent for pre-London payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<U256>,
    /// Number of the block.
    #[serde(with = "alloy_serde::quantity")]
    pub block_number: u64,
    /// Gas used by the block.
    #[serde(with = "alloy_serde::quantity")]
    pub gas_used: u64,
    /// Gas limit of the block.
    #[serde(with = "alloy_serde::quantity")]
    pub gas_limit: u64,
    /// Timestamp of the block.
    #[serde(with = "alloy_serde::quantity")]
    pub timestamp: u64,
    /// EIP-2718 encoded transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Bytes>>,
    /// Identifier under which a locally built payload is served back to the driver.
    #[serde(default)]
    pub payload_id: PayloadId,
}

impl ExecutionPayload {
    /// Sets the identifier of a locally built payload.
    pub fn with_payload_id(mut self, payload_id: PayloadId) -> Self {
        self.payload_id = payload_id;
        self
    }
}

impl From<SealedBlock> for ExecutionPayload {
    fn from(value: SealedBlock) -> Self {
        let transactions = value.body.iter().map(encode_enveloped).collect();
        let (header, hash) = value.header.split();
        let base_fee_per_gas = header.base_fee_per_gas.filter(|_| header.eip1559);
        Self {
            parent_hash: Some(header.parent_hash),
            block_hash: Some(hash),
            coinbase: Some(header.beneficiary),
            state_root: Some(header.state_root),
            receipt_root: Some(header.receipts_root),
            logs_bloom: Some(header.logs_bloom),
            random: Some(header.random),
            extra_data: Some(header.extra_data),
            base_fee_per_gas,
            block_number: header.number,
            gas_used: header.gas_used,
            gas_limit: header.gas_limit,
            timestamp: header.timestamp,
            transactions: Some(transactions),
            payload_id: PayloadId::default(),
        }
    }
}

/// This structure contains the result of processing a payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadStatus {
    /// The verdict on the payload.
    pub status: PayloadStatusEnum,
    /// Hash of the most recent valid block in the branch defined by payload and its ancestors
    pub latest_valid_hash: B256,
}

impl PayloadStatus {
    /// Creates a new status with the given latest valid hash.
    pub const fn new(status: PayloadStatusEnum, latest_valid_hash: B256) -> Self {
        Self { status, latest_valid_hash }
    }

    /// The payload can not be judged yet.
    pub const fn syncing(latest_valid_hash: B256) -> Self {
        Self::new(PayloadStatusEnum::Syncing, latest_valid_hash)
    }

    /// Returns true if the payload was executed and found valid.
    pub const fn is_valid(&self) -> bool {
        matches!(self.status, PayloadStatusEnum::Valid)
    }

    /// Returns true if the payload was executed and rejected.
    pub const fn is_invalid(&self) -> bool {
        matches!(self.status, PayloadStatusEnum::Invalid)
    }

    /// Returns true if the payload could not be judged yet.
    pub const fn is_syncing(&self) -> bool {
        matches!(self.status, PayloadStatusEnum::Syncing)
    }
}

impl fmt::Display for PayloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (latest valid hash {})", self.status, self.latest_valid_hash)
    }
}

/// Status of a submitted payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadStatusEnum {
    /// The block was executed and is valid.
    Valid,
    /// The block was executed and is invalid.
    Invalid,
    /// Ancestors of the block are missing or another payload is still being processed.
    Syncing,
}

impl PayloadStatusEnum {
    /// Returns the string representation of the status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
            Self::Syncing => "SYNCING",
        }
    }
}

impl fmt::Display for PayloadStatusEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
