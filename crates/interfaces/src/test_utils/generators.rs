use alloy_consensus::{SignableTransaction, TxEip1559};
use alloy_primitives::{Address, Bytes, Signature, B256, U256};
use rand::Rng;
use strand_primitives::{
    proofs, Block, Header, SealedBlock, SealedHeader, TransactionSigned, EMPTY_OMMER_ROOT,
    MAXIMUM_EXTRA_DATA_SIZE, SERENITY_DIFFICULTY, SERENITY_NONCE,
};

/// Generates a range of random [SealedHeader]s.
///
/// The parent hash of the first header
/// in the result will be equal to `head`.
///
/// The headers are assumed to not be correct if validated.
pub fn random_header_range(rng: std::ops::Range<u64>, head: B256) -> Vec<SealedHeader> {
    let mut headers = Vec::with_capacity(rng.end.saturating_sub(rng.start) as usize);
    for idx in rng {
        headers.push(random_header(
            idx,
            Some(headers.last().map(|h: &SealedHeader| h.hash()).unwrap_or(head)),
        ));
    }
    headers
}

/// Generate a random [SealedHeader].
///
/// The header is assumed to not be correct if validated.
pub fn random_header(number: u64, parent: Option<B256>) -> SealedHeader {
    let header = Header {
        number,
        nonce: rand::random::<[u8; 8]>().into(),
        difficulty: U256::from(rand::random::<u32>()),
        parent_hash: parent.unwrap_or_default(),
        ..Default::default()
    };
    header.seal_slow()
}

/// Generates a random signed EIP-1559 transaction.
///
/// The signature is not recoverable, the transaction is only good for encoding.
pub fn random_signed_tx() -> TransactionSigned {
    let mut rng = rand::rng();
    let tx = TxEip1559 {
        chain_id: 1,
        nonce: rng.random::<u16>() as u64,
        gas_limit: 21_000,
        max_fee_per_gas: rng.random::<u32>() as u128,
        max_priority_fee_per_gas: 1,
        to: Address::random().into(),
        value: U256::from(rng.random::<u64>()),
        ..Default::default()
    };
    let signature = Signature::new(
        U256::from(rng.random::<u64>()) + U256::from(1u64),
        U256::from(rng.random::<u64>()) + U256::from(1u64),
        rng.random(),
    );
    tx.into_signed(signature).into()
}

/// Generate a random post-merge [SealedBlock] with `tx_count` transactions.
///
/// The header carries the proof-of-stake constants, a base fee, a full width extra data field
/// and the transactions root of its body, so that it can be reconstructed from its execution
/// payload. State related roots are random.
pub fn random_block(number: u64, parent: Option<B256>, tx_count: Option<u8>) -> SealedBlock {
    let mut rng = rand::rng();
    let tx_count = tx_count.unwrap_or_else(|| rng.random::<u8>() % 4);
    let body: Vec<TransactionSigned> = (0..tx_count).map(|_| random_signed_tx()).collect();

    let header = Header {
        parent_hash: parent.unwrap_or_default(),
        ommers_hash: EMPTY_OMMER_ROOT,
        beneficiary: Address::random(),
        state_root: B256::random(),
        transactions_root: proofs::calculate_transaction_root(&body),
        receipts_root: B256::random(),
        difficulty: SERENITY_DIFFICULTY,
        number,
        gas_limit: 30_000_000,
        gas_used: 21_000 * tx_count as u64,
        timestamp: 1_700_000_000 + number * 12,
        extra_data: Bytes::from(B256::random().to_vec()),
        nonce: SERENITY_NONCE,
        random: B256::random(),
        eip3675: true,
        eip1559: true,
        base_fee_per_gas: Some(U256::from(rng.random_range(1..1_000_000_000u64))),
        ..Default::default()
    };
    debug_assert_eq!(header.extra_data.len(), MAXIMUM_EXTRA_DATA_SIZE);

    Block { header, body }.seal_slow()
}

/// Generates a chain of random post-merge blocks, the first one building on `head`.
pub fn random_block_range(rng: std::ops::Range<u64>, head: B256) -> Vec<SealedBlock> {
    let mut blocks: Vec<SealedBlock> =
        Vec::with_capacity(rng.end.saturating_sub(rng.start) as usize);
    for idx in rng {
        let parent = blocks.last().map(|block| block.hash()).unwrap_or(head);
        blocks.push(random_block(idx, Some(parent), None));
    }
    blocks
}
