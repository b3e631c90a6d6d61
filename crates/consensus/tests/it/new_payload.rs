use crate::{TestHarness, WAIT};
use assert_matches::assert_matches;
use std::time::Duration;
use strand_config::EngineConfig;
use strand_consensus::{CancelReason, EngineApiError};
use strand_interfaces::{
    sync::ExecutionStatus,
    test_utils::generators::{random_block, random_block_range},
};
use strand_primitives::{Bytes, B256};
use strand_rpc_types::engine::{ExecutionPayload, PayloadStatus, PayloadStatusEnum};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

impl TestHarness {
    /// Submits the payload on its own task.
    fn spawn_new_payload(
        &self,
        payload: ExecutionPayload,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<PayloadStatus, EngineApiError>> {
        let api = self.api.clone();
        tokio::spawn(async move { api.new_payload_with_cancel(payload, &cancel).await })
    }

    /// Receives the next forwarded block and answers with the given verdict.
    async fn judge(&mut self, valid: bool) -> B256 {
        let block = tokio::time::timeout(WAIT, self.pipeline.blocks.recv())
            .await
            .expect("no block forwarded")
            .expect("engine gone");
        let status = if valid {
            ExecutionStatus::valid(block.hash())
        } else {
            ExecutionStatus::invalid(block.hash())
        };
        self.pipeline.status.send(status).await.unwrap();
        block.hash()
    }
}

#[tokio::test]
async fn refused_without_terminal_total_difficulty() {
    let harness =
        TestHarness::with_config(EngineConfig::default().with_terminal_total_difficulty(None));
    let payload = ExecutionPayload::from(harness.next_block());

    assert_matches!(harness.api.new_payload(payload).await, Err(EngineApiError::NotPostMerge));
    // even an empty payload is refused for that reason first
    assert_matches!(
        harness.api.new_payload(ExecutionPayload::default()).await,
        Err(EngineApiError::NotPostMerge)
    );
}

#[tokio::test]
async fn hash_mismatch_is_never_forwarded() {
    let mut harness = TestHarness::new();
    let block = harness.next_block();
    let mut payload = ExecutionPayload::from(block.clone());
    payload.block_hash = Some(B256::random());

    assert_matches!(
        harness.api.new_payload(payload).await,
        Err(EngineApiError::HashMismatch { computed, .. }) if computed == block.hash()
    );
    assert!(harness.pipeline.blocks.try_recv().is_err());
    assert_eq!(harness.api.number_sent().await, 0);
}

#[tokio::test]
async fn incomplete_payload_leaves_state_untouched() {
    let mut harness = TestHarness::new();
    let mut payload = ExecutionPayload::from(harness.next_block());
    payload.random = None;

    assert_matches!(
        harness.api.new_payload(payload).await,
        Err(EngineApiError::InvalidPayload { field: "random" })
    );
    assert!(harness.pipeline.blocks.try_recv().is_err());
    assert_eq!(harness.api.number_sent().await, 0);
}

#[tokio::test]
async fn malformed_transaction_is_rejected() {
    let mut harness = TestHarness::new();
    let mut payload = ExecutionPayload::from(harness.next_block());
    payload.transactions = Some(vec![Bytes::from_static(&[0x02, 0xc0])]);

    assert_matches!(
        harness.api.new_payload(payload).await,
        Err(EngineApiError::MalformedTransaction { index: 0, .. })
    );
    assert!(harness.pipeline.blocks.try_recv().is_err());
}

#[tokio::test]
async fn head_lookup_failure() {
    let harness = TestHarness::new();
    let payload = ExecutionPayload::from(harness.next_block());
    harness.head.set_fail_lookup(true);

    assert_matches!(
        harness.api.new_payload(payload).await,
        Err(EngineApiError::HeadUnavailable(_))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn valid_verdict_reports_own_hash() {
    let mut harness = TestHarness::new();
    let block = harness.next_block();
    let submission =
        harness.spawn_new_payload(ExecutionPayload::from(block.clone()), CancellationToken::new());

    assert_eq!(harness.judge(true).await, block.hash());
    let status = submission.await.unwrap().unwrap();
    assert_eq!(status, PayloadStatus::new(PayloadStatusEnum::Valid, block.hash()));
    assert_eq!(harness.api.number_sent().await, block.number);
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_verdict_reports_prior_head() {
    let mut harness = TestHarness::new();
    let block = harness.next_block();
    let submission =
        harness.spawn_new_payload(ExecutionPayload::from(block.clone()), CancellationToken::new());

    harness.judge(false).await;
    let status = submission.await.unwrap().unwrap();
    assert_eq!(status, PayloadStatus::new(PayloadStatusEnum::Invalid, harness.genesis.hash()));
    assert_eq!(harness.canonical_head().best_hash, harness.genesis.hash());

    // the rejected block does not keep the gate closed
    assert_eq!(harness.api.number_sent().await, 0);
    let retry = harness.next_block();
    let submission =
        harness.spawn_new_payload(ExecutionPayload::from(retry.clone()), CancellationToken::new());
    assert_eq!(harness.judge(true).await, retry.hash());
    assert!(submission.await.unwrap().unwrap().is_valid());
}

#[tokio::test]
async fn non_contiguous_payload_is_commissioned() {
    let mut harness = TestHarness::new();
    let block = random_block(42, Some(B256::random()), None);

    let status = harness.api.new_payload(ExecutionPayload::from(block.clone())).await.unwrap();
    assert_eq!(status, PayloadStatus::syncing(harness.genesis.hash()));

    // the block is still handed over for reverse sync
    assert_eq!(harness.pipeline.blocks.try_recv().ok(), Some(block));
    assert_eq!(harness.api.number_sent().await, 42);
}

#[tokio::test(flavor = "multi_thread")]
async fn second_payload_waits_for_the_first() {
    let mut harness = TestHarness::new();
    let first = harness.next_block();
    let second = harness.next_block();
    assert_eq!(first.number, second.number);

    let pending =
        harness.spawn_new_payload(ExecutionPayload::from(first.clone()), CancellationToken::new());
    let forwarded = tokio::time::timeout(WAIT, harness.pipeline.blocks.recv()).await.unwrap();
    assert_eq!(forwarded.map(|block| block.hash()), Some(first.hash()));

    // the first block is executing, the gate stays closed
    assert_eq!(harness.canonical_head().best_hash, first.parent_hash);
    let status = harness.api.new_payload(ExecutionPayload::from(second)).await.unwrap();
    assert_eq!(status, PayloadStatus::syncing(harness.genesis.hash()));
    assert!(harness.pipeline.blocks.try_recv().is_err());
    assert_eq!(harness.api.number_sent().await, first.number);

    harness.pipeline.status.send(ExecutionStatus::valid(first.hash())).await.unwrap();
    assert!(pending.await.unwrap().unwrap().is_valid());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_payloads_forward_exactly_one() {
    let mut harness = TestHarness::new();
    let submissions: Vec<_> = (0..8)
        .map(|_| {
            harness.spawn_new_payload(
                ExecutionPayload::from(harness.next_block()),
                CancellationToken::new(),
            )
        })
        .collect();

    let forwarded = harness.judge(true).await;

    let mut valid = 0;
    for submission in submissions {
        let status = submission.await.unwrap().unwrap();
        if status.is_valid() {
            assert_eq!(status.latest_valid_hash, forwarded);
            valid += 1;
        } else {
            assert_eq!(status, PayloadStatus::syncing(harness.genesis.hash()));
        }
    }
    assert_eq!(valid, 1);
    assert!(harness.pipeline.blocks.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn chain_of_payloads() {
    let mut harness = TestHarness::new();
    for block in random_block_range(1..4, harness.genesis.hash()) {
        let submission = harness
            .spawn_new_payload(ExecutionPayload::from(block.clone()), CancellationToken::new());
        assert_eq!(harness.judge(true).await, block.hash());
        assert_eq!(
            submission.await.unwrap().unwrap(),
            PayloadStatus::new(PayloadStatusEnum::Valid, block.hash())
        );
        harness.advance(&block);
    }
    assert_eq!(harness.api.number_sent().await, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_caller_stops_waiting() {
    let mut harness = TestHarness::new();
    let block = harness.next_block();
    let cancel = CancellationToken::new();
    let submission = harness.spawn_new_payload(ExecutionPayload::from(block), cancel.clone());

    tokio::time::timeout(WAIT, harness.pipeline.blocks.recv()).await.unwrap().unwrap();
    cancel.cancel();

    let result = tokio::time::timeout(WAIT, submission).await.expect("submission hangs").unwrap();
    assert_matches!(result, Err(EngineApiError::Cancelled(CancelReason::Caller)));
}

#[tokio::test(flavor = "multi_thread")]
async fn late_rejection_of_cancelled_payload_reopens_gate() {
    let mut harness = TestHarness::new();
    let block = harness.next_block();
    let cancel = CancellationToken::new();
    let submission =
        harness.spawn_new_payload(ExecutionPayload::from(block.clone()), cancel.clone());

    tokio::time::timeout(WAIT, harness.pipeline.blocks.recv()).await.unwrap().unwrap();
    cancel.cancel();
    let result = tokio::time::timeout(WAIT, submission).await.expect("submission hangs").unwrap();
    assert_matches!(result, Err(EngineApiError::Cancelled(CancelReason::Caller)));

    harness.pipeline.status.send(ExecutionStatus::invalid(block.hash())).await.unwrap();
    assert_eq!(harness.api.number_sent().await, block.number);

    for _ in 0..3 {
        let retry = harness.next_block();
        let submission = harness
            .spawn_new_payload(ExecutionPayload::from(retry.clone()), CancellationToken::new());
        assert_eq!(harness.judge(false).await, retry.hash());
        let status = submission.await.unwrap().unwrap();
        assert_eq!(status, PayloadStatus::new(PayloadStatusEnum::Invalid, harness.genesis.hash()));
        assert_eq!(harness.api.number_sent().await, 0);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_stops_waiting() {
    let mut harness = TestHarness::new();
    let submission = harness
        .spawn_new_payload(ExecutionPayload::from(harness.next_block()), CancellationToken::new());

    tokio::time::timeout(WAIT, harness.pipeline.blocks.recv()).await.unwrap().unwrap();
    harness.shutdown.cancel();

    let result = tokio::time::timeout(WAIT, submission).await.expect("submission hangs").unwrap();
    assert_matches!(result, Err(EngineApiError::Cancelled(CancelReason::Shutdown)));
}

#[tokio::test(flavor = "multi_thread")]
async fn verdict_timeout() {
    let mut harness = TestHarness::with_config(
        EngineConfig::default().with_verdict_timeout(Duration::from_millis(50)),
    );
    let submission = harness
        .spawn_new_payload(ExecutionPayload::from(harness.next_block()), CancellationToken::new());

    tokio::time::timeout(WAIT, harness.pipeline.blocks.recv()).await.unwrap().unwrap();
    let result = tokio::time::timeout(WAIT, submission).await.expect("submission hangs").unwrap();
    assert_matches!(result, Err(EngineApiError::Cancelled(CancelReason::Timeout)));
}
