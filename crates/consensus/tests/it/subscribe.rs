use crate::{wait_for_subscriptions, TestHarness, WAIT};
use alloy_rlp::Decodable;
use strand_consensus::HeaderSink;
use strand_interfaces::test_utils::generators::random_block_range;
use strand_primitives::{Header, SealedHeader};
use strand_rpc_types::{EventKind, SubscribeReply};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn canonical_headers(harness: &TestHarness, count: u64) -> Vec<SealedHeader> {
    random_block_range(1..count + 1, harness.genesis.hash())
        .into_iter()
        .map(|block| block.header)
        .collect()
}

fn decode(reply: SubscribeReply) -> Header {
    assert_eq!(reply.event, EventKind::Header);
    Header::decode(&mut reply.data.as_ref()).unwrap()
}

impl TestHarness {
    fn spawn_subscription<S: HeaderSink>(
        &self,
        sink: S,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let api = self.api.clone();
        tokio::spawn(async move { api.subscribe_headers(sink, cancel).await })
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn headers_arrive_in_canonical_order() {
    let harness = TestHarness::new();
    let events = harness.api.events();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (other_tx, mut other_rx) = mpsc::channel(8);
    let cancel = CancellationToken::new();
    let subscription = harness.spawn_subscription(tx, cancel.clone());
    let other = harness.spawn_subscription(other_tx, cancel.clone());
    wait_for_subscriptions(&events, 2).await;

    let headers = canonical_headers(&harness, 3);
    for header in &headers {
        events.on_new_header(header);
    }

    for expected in &headers {
        assert_eq!(decode(rx.recv().await.unwrap()).hash_slow(), expected.hash());
        assert_eq!(decode(other_rx.recv().await.unwrap()).hash_slow(), expected.hash());
    }

    cancel.cancel();
    tokio::time::timeout(WAIT, subscription).await.unwrap().unwrap();
    tokio::time::timeout(WAIT, other).await.unwrap().unwrap();
    assert_eq!(events.header_subscriptions(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_sink_receives_nothing_more() {
    let harness = TestHarness::new();
    let events = harness.api.events();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (gone_tx, mut gone_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let _healthy = harness.spawn_subscription(tx, cancel.clone());
    let _gone = harness.spawn_subscription(gone_tx, cancel.clone());
    wait_for_subscriptions(&events, 2).await;

    let headers = canonical_headers(&harness, 3);
    events.on_new_header(&headers[0]);
    assert_eq!(decode(gone_rx.recv().await.unwrap()).hash_slow(), headers[0].hash());

    // the peer disconnects after the first header
    drop(gone_rx);
    events.on_new_header(&headers[1]);
    events.on_new_header(&headers[2]);
    assert_eq!(events.header_subscriptions(), 1);

    for expected in &headers {
        assert_eq!(decode(rx.recv().await.unwrap()).hash_slow(), expected.hash());
    }
    cancel.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_ends_subscriptions() {
    let harness = TestHarness::new();
    let events = harness.api.events();
    let (tx, _rx) = mpsc::unbounded_channel::<SubscribeReply>();
    let subscription = harness.spawn_subscription(tx, CancellationToken::new());
    wait_for_subscriptions(&events, 1).await;

    harness.shutdown.cancel();
    tokio::time::timeout(WAIT, subscription).await.unwrap().unwrap();
    assert_eq!(events.header_subscriptions(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn aborted_subscription_is_removed() {
    let harness = TestHarness::new();
    let events = harness.api.events();
    let (tx, _rx) = mpsc::unbounded_channel::<SubscribeReply>();
    let subscription = harness.spawn_subscription(tx, CancellationToken::new());
    wait_for_subscriptions(&events, 1).await;

    subscription.abort();
    assert!(subscription.await.unwrap_err().is_cancelled());
    wait_for_subscriptions(&events, 0).await;
}
