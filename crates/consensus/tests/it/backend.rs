use crate::TestHarness;
use assert_matches::assert_matches;
use strand_consensus::{engine::ETH_PROTOCOL_VERSION, EngineApiError};
use strand_interfaces::test_utils::generators::random_block;
use strand_primitives::{Address, Bytes};

#[test]
fn versions() {
    let harness = TestHarness::new();
    assert_eq!(harness.api.version().to_string(), "2.1.0");
    assert_eq!(harness.api.protocol_version(), ETH_PROTOCOL_VERSION);
    assert!(harness.api.client_version().starts_with("strand/v"));
}

#[test]
fn backend_pass_through() {
    let harness = TestHarness::new();
    assert_eq!(harness.api.etherbase().unwrap(), Address::repeat_byte(0xee));
    assert_eq!(harness.api.net_version().unwrap(), 1);
    assert_eq!(harness.api.net_peer_count().unwrap(), 25);
}

#[test]
fn backend_errors_are_propagated() {
    use std::sync::Arc;
    use strand_config::EngineConfig;
    use strand_consensus::{sync_channels, EngineApi};
    use strand_interfaces::test_utils::{TestCanonicalHead, TestEthBackend};
    use tokio_util::sync::CancellationToken;

    let (coordinator, _pipeline) = sync_channels();
    let api = EngineApi::new(
        Arc::new(TestCanonicalHead::default()),
        TestEthBackend::default(),
        EngineConfig::default(),
        coordinator,
        CancellationToken::new(),
    );
    assert_matches!(api.etherbase(), Err(EngineApiError::Backend(_)));
}

#[test]
fn serves_stored_block_with_senders() {
    let harness = TestHarness::new();
    let block = random_block(7, Some(harness.genesis.hash()), Some(2));
    let senders = vec![Address::repeat_byte(1), Address::repeat_byte(2)];
    harness.head.insert_block(block.clone(), senders);

    let reply = harness.api.block(block.hash(), 7).unwrap();
    assert_eq!(reply.block_rlp, Bytes::from(alloy_rlp::encode(block.clone().unseal())));
    assert_eq!(reply.senders.len(), 40);
    assert_eq!(reply.senders[..20], [1u8; 20]);
    assert_eq!(reply.senders[20..], [2u8; 20]);

    assert_matches!(
        harness.api.block(block.hash(), 8),
        Err(EngineApiError::UnknownBlock { number: 8, .. })
    );
    harness.head.set_fail_lookup(true);
    assert_matches!(harness.api.block(block.hash(), 7), Err(EngineApiError::BlockUnavailable(_)));
}
