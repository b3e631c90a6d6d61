use std::sync::Arc;
use strand_config::EngineConfig;
use strand_interfaces::{
    backend::EthBackend,
    provider::{BlockReader, CanonicalHeadProvider},
};
use strand_primitives::{Address, BlockHash, BlockNumber};
use strand_rpc_types::{
    engine::{ExecutionPayload, PayloadId, PayloadStatus},
    BlockReply, SubscribeReply, VersionReply,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

mod coordinator;
pub use coordinator::{sync_channels, SyncCoordinator, SyncPipelineChannels, WaitScope};

mod error;
pub use error::{CancelReason, EngineApiError, EngineApiResult};

mod events;
pub use events::{Events, HeaderSink, HeaderSubscription, SinkError, SubscriptionId};

pub mod payload;

mod store;
pub use store::PayloadStore;

/// Version of the backend API served next to the engine methods.
pub const ENGINE_API_VERSION: VersionReply = VersionReply { major: 2, minor: 1, patch: 0 };

/// The eth wire protocol version the node speaks.
pub const ETH_PROTOCOL_VERSION: u64 = 66;

/// The engine API served to the consensus driver.
///
/// Every method may be called concurrently. Payload submissions are serialized by the
/// [`SyncCoordinator`] where needed.
#[derive(Debug)]
pub struct EngineApi<Provider, Backend> {
    /// Read access to the canonical head and stored blocks
    provider: Provider,
    /// Answers the node level queries
    backend: Backend,
    config: EngineConfig,
    coordinator: SyncCoordinator,
    payloads: PayloadStore,
    events: Arc<Events>,
    /// Cancelled when the node shuts down
    shutdown: CancellationToken,
}

impl<Provider, Backend> EngineApi<Provider, Backend>
where
    Provider: CanonicalHeadProvider + BlockReader,
    Backend: EthBackend,
{
    /// Creates the engine API on top of the engine side of [`sync_channels`].
    pub fn new(
        provider: Provider,
        backend: Backend,
        config: EngineConfig,
        coordinator: SyncCoordinator,
        shutdown: CancellationToken,
    ) -> Self {
        let payloads = PayloadStore::new(config.payload_store);
        Self {
            provider,
            backend,
            config,
            coordinator,
            payloads,
            events: Arc::new(Events::new()),
            shutdown,
        }
    }

    /// The subscription registry, to be fed with every header that becomes canonical.
    pub fn events(&self) -> Arc<Events> {
        self.events.clone()
    }

    /// Returns the number of the last block forwarded to the sync pipeline.
    pub async fn number_sent(&self) -> u64 {
        self.coordinator.number_sent().await
    }

    fn ensure_post_merge(&self) -> EngineApiResult<()> {
        if self.config.is_post_merge() {
            Ok(())
        } else {
            Err(EngineApiError::NotPostMerge)
        }
    }

    /// Receives a payload to validate and execute.
    ///
    /// See also [`EngineApi::new_payload_with_cancel`].
    pub async fn new_payload(&self, payload: ExecutionPayload) -> EngineApiResult<PayloadStatus> {
        self.new_payload_with_cancel(payload, &CancellationToken::new()).await
    }

    /// Receives a payload to validate and execute, giving up once `cancel` fires.
    ///
    /// A payload that does not extend the canonical head, or that arrives while another one is
    /// being executed, is answered with `SYNCING` and the canonical head hash. Otherwise the call
    /// returns the sync pipeline's verdict.
    pub async fn new_payload_with_cancel(
        &self,
        payload: ExecutionPayload,
        cancel: &CancellationToken,
    ) -> EngineApiResult<PayloadStatus> {
        self.ensure_post_merge()?;
        let block = payload::try_construct_block(&payload)?;
        info!(
            target: "engine::api",
            hash = ?block.hash(),
            number = block.number,
            txs = block.body.len(),
            "Received payload from consensus driver"
        );

        let scope = WaitScope::new(cancel, &self.shutdown, self.config.verdict_timeout);
        let status = self.coordinator.submit(&self.provider, block, &scope).await?;
        trace!(target: "engine::api", %status, "Payload processed");
        Ok(status)
    }

    /// Stores a payload assembled by the local block builder.
    pub fn insert_payload(&self, id: PayloadId, payload: ExecutionPayload) {
        if self.payloads.insert(id, payload).is_some() {
            trace!(target: "engine::api", %id, "Replaced built payload");
        }
    }

    /// Retrieves a previously assembled payload.
    pub fn get_payload(&self, id: PayloadId) -> EngineApiResult<ExecutionPayload> {
        self.ensure_post_merge()?;
        self.payloads.get(&id).ok_or(EngineApiError::UnknownPayload)
    }

    /// Streams every new canonical header into `sink` until `cancel` fires or the node shuts
    /// down.
    ///
    /// The sink is dropped early if a write fails.
    pub async fn subscribe_headers<S: HeaderSink>(&self, sink: S, cancel: CancellationToken) {
        trace!(target: "engine::events", "Establishing header subscription");
        let id = self.events.add_header_subscription(Box::new(move |header| {
            let data = alloy_rlp::encode(header);
            sink.try_send(SubscribeReply::header(data.into())).inspect_err(|err| {
                info!(target: "engine::events", %err, "Header subscription closed");
            })
        }));
        let _guard = SubscriptionGuard { events: &self.events, id };

        info!(target: "engine::events", %id, "Header subscription established");
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = self.shutdown.cancelled() => {}
        }
        info!(target: "engine::events", %id, "Header subscription ended");
    }

    /// Serves a stored block with the senders of its transactions.
    pub fn block(&self, hash: BlockHash, number: BlockNumber) -> EngineApiResult<BlockReply> {
        let block = self
            .provider
            .block_with_senders(hash, number)
            .map_err(EngineApiError::BlockUnavailable)?
            .ok_or(EngineApiError::UnknownBlock { hash, number })?;
        trace!(target: "engine::api", ?hash, number, txs = block.senders.len(), "Serving block");
        Ok(BlockReply {
            block_rlp: alloy_rlp::encode(&block.block).into(),
            senders: block.senders_bytes().into(),
        })
    }

    /// API version of the backend.
    pub const fn version(&self) -> VersionReply {
        ENGINE_API_VERSION
    }

    /// The eth wire protocol version.
    pub const fn protocol_version(&self) -> u64 {
        ETH_PROTOCOL_VERSION
    }

    /// Name and version of this client.
    pub fn client_version(&self) -> String {
        format!("strand/v{}", env!("CARGO_PKG_VERSION"))
    }

    /// The address credited when this node builds blocks.
    pub fn etherbase(&self) -> EngineApiResult<Address> {
        self.backend.etherbase().map_err(|err| {
            warn!(target: "engine::api", %err, "Etherbase unavailable");
            err.into()
        })
    }

    /// The network id.
    pub fn net_version(&self) -> EngineApiResult<u64> {
        Ok(self.backend.net_version()?)
    }

    /// The number of connected peers.
    pub fn net_peer_count(&self) -> EngineApiResult<u64> {
        Ok(self.backend.net_peer_count()?)
    }
}

/// Removes a header subscription when the subscribing call ends, including when it is dropped.
struct SubscriptionGuard<'a> {
    events: &'a Events,
    id: SubscriptionId,
}

impl Drop for SubscriptionGuard<'_> {
    fn drop(&mut self) {
        self.events.remove_header_subscription(self.id);
    }
}
