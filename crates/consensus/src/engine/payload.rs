//! Reconstruction of blocks from execution payloads.

use crate::engine::{EngineApiError, EngineApiResult};
use strand_primitives::{
    decode_enveloped, proofs, Address, Bloom, Bytes, Header, SealedBlock, TransactionSigned, B256,
    EMPTY_OMMER_ROOT, MAXIMUM_EXTRA_DATA_SIZE, SERENITY_DIFFICULTY, SERENITY_NONCE, U256,
};
use strand_rpc_types::engine::ExecutionPayload;

/// A payload whose mandatory fields are present and whose transactions decoded.
///
/// Building one touches no shared state, every rejection is local to the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPayload {
    parent_hash: B256,
    block_hash: B256,
    coinbase: Address,
    state_root: B256,
    receipt_root: B256,
    logs_bloom: Bloom,
    random: B256,
    /// Extra data packed into a fixed width word.
    extra_data: B256,
    base_fee_per_gas: Option<U256>,
    number: u64,
    gas_used: u64,
    gas_limit: u64,
    timestamp: u64,
    transactions: Vec<TransactionSigned>,
}

impl ValidatedPayload {
    /// Hash the driver declared for the block.
    pub const fn block_hash(&self) -> B256 {
        self.block_hash
    }

    /// The decoded transactions, in payload order.
    pub fn transactions(&self) -> &[TransactionSigned] {
        &self.transactions
    }

    /// Rebuilds the header the payload describes.
    ///
    /// Everything the payload does not carry is fixed by the proof-of-stake rules, so the result
    /// only depends on the payload.
    pub fn header(&self) -> Header {
        Header {
            parent_hash: self.parent_hash,
            ommers_hash: EMPTY_OMMER_ROOT,
            beneficiary: self.coinbase,
            state_root: self.state_root,
            transactions_root: proofs::calculate_transaction_root(&self.transactions),
            receipts_root: self.receipt_root,
            logs_bloom: self.logs_bloom,
            difficulty: SERENITY_DIFFICULTY,
            number: self.number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: Bytes::copy_from_slice(self.extra_data.as_slice()),
            mix_hash: B256::ZERO,
            nonce: SERENITY_NONCE,
            random: self.random,
            eip3675: true,
            eip1559: self.base_fee_per_gas.is_some(),
            base_fee_per_gas: self.base_fee_per_gas,
        }
    }

    /// Seals the reconstructed header and checks it against the declared block hash.
    pub fn try_into_block(self) -> EngineApiResult<SealedBlock> {
        let header = self.header().seal_slow();
        if header.hash() != self.block_hash {
            return Err(EngineApiError::HashMismatch {
                computed: header.hash(),
                expected: self.block_hash,
            })
        }
        Ok(SealedBlock::new(header, self.transactions))
    }
}

impl TryFrom<&ExecutionPayload> for ValidatedPayload {
    type Error = EngineApiError;

    fn try_from(payload: &ExecutionPayload) -> Result<Self, Self::Error> {
        let parent_hash = required(payload.parent_hash, "parentHash")?;
        let block_hash = required(payload.block_hash, "blockHash")?;
        let coinbase = required(payload.coinbase, "coinbase")?;
        let extra_data = required(payload.extra_data.as_ref(), "extraData")?;
        let logs_bloom = required(payload.logs_bloom, "logsBloom")?;
        let receipt_root = required(payload.receipt_root, "receiptRoot")?;
        let state_root = required(payload.state_root, "stateRoot")?;
        let random = required(payload.random, "random")?;
        let transactions = required(payload.transactions.as_ref(), "transactions")?;

        // Extra data can go from 0 to 32 bytes, so it can be treated as a hash
        if extra_data.len() > MAXIMUM_EXTRA_DATA_SIZE {
            return Err(EngineApiError::PayloadExtraData(extra_data.clone()))
        }
        let extra_data = B256::left_padding_from(extra_data);

        let transactions = transactions
            .iter()
            .enumerate()
            .map(|(index, tx)| {
                decode_enveloped(tx)
                    .map_err(|source| EngineApiError::MalformedTransaction { index, source })
            })
            .collect::<EngineApiResult<Vec<_>>>()?;

        Ok(Self {
            parent_hash,
            block_hash,
            coinbase,
            state_root,
            receipt_root,
            logs_bloom,
            random,
            extra_data,
            base_fee_per_gas: payload.base_fee_per_gas,
            number: payload.block_number,
            gas_used: payload.gas_used,
            gas_limit: payload.gas_limit,
            timestamp: payload.timestamp,
            transactions,
        })
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> EngineApiResult<T> {
    value.ok_or(EngineApiError::InvalidPayload { field })
}

/// Try to construct a block from given payload.
///
/// NOTE: The logs bloom is assumed to be validated during deserialization.
/// NOTE: Empty ommers, nonce and difficulty values are validated upon computing block hash and
/// comparing the value with `payload.block_hash`.
pub fn try_construct_block(payload: &ExecutionPayload) -> EngineApiResult<SealedBlock> {
    ValidatedPayload::try_from(payload)?.try_into_block()
}
