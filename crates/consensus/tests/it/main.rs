//! Engine API integration tests.
//!
//! The sync pipeline is played by the test through the [`SyncPipelineChannels`] of the harness.

use std::{sync::Arc, time::Duration};
use strand_config::EngineConfig;
use strand_consensus::{sync_channels, EngineApi, Events, SyncPipelineChannels};
use strand_interfaces::{
    provider::CanonicalHeadProvider,
    test_utils::{
        generators::{random_block, random_header},
        TestCanonicalHead, TestEthBackend,
    },
};
use strand_primitives::{Address, ChainInfo, SealedBlock, SealedHeader};
use tokio_util::sync::CancellationToken;

mod backend;
mod new_payload;
mod subscribe;

type TestApi = EngineApi<Arc<TestCanonicalHead>, TestEthBackend>;

/// Upper bound for anything a test waits on.
const WAIT: Duration = Duration::from_secs(5);

struct TestHarness {
    api: Arc<TestApi>,
    head: Arc<TestCanonicalHead>,
    pipeline: SyncPipelineChannels,
    shutdown: CancellationToken,
    genesis: SealedHeader,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    fn with_config(config: EngineConfig) -> Self {
        strand_tracing::init_test_tracing();

        let genesis = random_header(0, None);
        let head = Arc::new(TestCanonicalHead::with_header(&genesis));
        let backend = TestEthBackend {
            etherbase: Some(Address::repeat_byte(0xee)),
            net_version: 1,
            peer_count: 25,
        };
        let shutdown = CancellationToken::new();
        let (coordinator, pipeline) = sync_channels();
        let api = Arc::new(EngineApi::new(
            head.clone(),
            backend,
            config,
            coordinator,
            shutdown.clone(),
        ));
        Self { api, head, pipeline, shutdown, genesis }
    }

    /// A block extending the current canonical head.
    fn next_block(&self) -> SealedBlock {
        let head = self.canonical_head();
        random_block(head.best_number + 1, Some(head.best_hash), None)
    }

    fn canonical_head(&self) -> ChainInfo {
        self.head.canonical_head().unwrap()
    }

    /// Makes the block canonical, as the sync pipeline would after executing it.
    fn advance(&self, block: &SealedBlock) {
        self.head.set_head(ChainInfo::new(block.hash(), block.number));
    }
}

/// Waits until the registry holds `count` header subscriptions.
async fn wait_for_subscriptions(events: &Events, count: usize) {
    tokio::time::timeout(WAIT, async {
        while events.header_subscriptions() != count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("subscriptions not registered");
}

const fn main() {}
