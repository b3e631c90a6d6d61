//! Hand off of reconstructed blocks to the sync pipeline.

use crate::engine::{CancelReason, EngineApiError, EngineApiResult};
use std::{future::Future, time::Duration};
use strand_interfaces::{provider::CanonicalHeadProvider, sync::ExecutionStatus};
use strand_primitives::{BlockHash, BlockNumber, SealedBlock};
use strand_rpc_types::engine::{PayloadStatus, PayloadStatusEnum};
use tokio::{
    sync::{mpsc, Mutex},
    time::{sleep_until, Instant},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Both coordination channels are single slot rendezvous points.
const CHANNEL_CAPACITY: usize = 1;

/// Creates the coordination channels between the engine and the sync pipeline.
///
/// The engine side ends up in the [`SyncCoordinator`], the pipeline side in the
/// [`SyncPipelineChannels`].
pub fn sync_channels() -> (SyncCoordinator, SyncPipelineChannels) {
    let (to_pipeline, blocks) = mpsc::channel(CHANNEL_CAPACITY);
    let (status, from_pipeline) = mpsc::channel(CHANNEL_CAPACITY);
    (SyncCoordinator::new(to_pipeline, from_pipeline), SyncPipelineChannels { blocks, status })
}

/// The sync pipeline's ends of the coordination channels.
#[derive(Debug)]
pub struct SyncPipelineChannels {
    /// Blocks to execute, or to reverse sync from when their parent is unknown.
    pub blocks: mpsc::Receiver<SealedBlock>,
    /// Verdicts on executed blocks.
    pub status: mpsc::Sender<ExecutionStatus>,
}

/// A forwarded block whose verdict is still outstanding.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    hash: BlockHash,
    number: BlockNumber,
    /// Canonical head number when the block was forwarded.
    head_number: BlockNumber,
}

/// State guarded by the forwarding lock.
#[derive(Debug)]
struct Forwarder {
    /// Number of the last block handed to the pipeline.
    number_sent: BlockNumber,
    /// The last block handed to the pipeline, until its verdict is settled.
    in_flight: Option<InFlight>,
    to_pipeline: mpsc::Sender<SealedBlock>,
}

impl Forwarder {
    /// Applies a verdict on the block in flight, reopening the gate if the block was rejected.
    ///
    /// Returns `false` if the verdict is about any other block.
    fn settle(&mut self, status: &ExecutionStatus) -> bool {
        let Some(in_flight) = self.in_flight.filter(|block| block.hash == status.block_hash) else {
            return false
        };
        self.in_flight = None;
        if !status.valid && self.number_sent == in_flight.number {
            self.number_sent = in_flight.head_number;
        }
        true
    }
}

/// Enforces that at most one forwarded block awaits a verdict.
///
/// Reading the gate and forwarding a block happen under one lock, so concurrent submissions can
/// not both pass the gate.
///
/// A submission that stops waiting leaves its block in flight. The verdict on that block is then
/// settled by the next submission finding the gate closed.
#[derive(Debug)]
pub struct SyncCoordinator {
    forwarder: Mutex<Forwarder>,
    from_pipeline: Mutex<mpsc::Receiver<ExecutionStatus>>,
}

impl SyncCoordinator {
    fn new(
        to_pipeline: mpsc::Sender<SealedBlock>,
        from_pipeline: mpsc::Receiver<ExecutionStatus>,
    ) -> Self {
        Self {
            forwarder: Mutex::new(Forwarder { number_sent: 0, in_flight: None, to_pipeline }),
            from_pipeline: Mutex::new(from_pipeline),
        }
    }

    /// Number of the last block handed to the pipeline.
    pub async fn number_sent(&self) -> BlockNumber {
        self.forwarder.lock().await.number_sent
    }

    /// Drives a validated block through the pipeline handshake.
    ///
    /// Returns `SYNCING` without forwarding if an earlier block is still in flight, and after
    /// forwarding if the block does not extend the canonical head. Otherwise waits for the
    /// pipeline's verdict on it.
    pub async fn submit<P>(
        &self,
        provider: &P,
        block: SealedBlock,
        scope: &WaitScope<'_>,
    ) -> EngineApiResult<PayloadStatus>
    where
        P: CanonicalHeadProvider,
    {
        let block_hash = block.hash();
        let block_number = block.number;
        let parent_hash = block.parent_hash;

        let (head, from_pipeline) = {
            let mut forwarder = scope.run(self.forwarder.lock()).await?;
            let head = provider.canonical_head().map_err(EngineApiError::HeadUnavailable)?;

            if forwarder.number_sent > head.best_number {
                self.drain_verdicts(&mut forwarder);
            }
            if forwarder.number_sent > head.best_number {
                debug!(
                    target: "engine::coordinator",
                    number_sent = forwarder.number_sent,
                    head = head.best_number,
                    ?block_hash,
                    "Payload still in flight, replying syncing"
                );
                return Ok(PayloadStatus::syncing(head.best_hash))
            }

            // Claim the verdicts before forwarding so no gate check drains ours.
            let from_pipeline = if parent_hash == head.best_hash {
                Some(scope.run(self.from_pipeline.lock()).await?)
            } else {
                None
            };

            info!(target: "engine::coordinator", ?block_hash, block_number, "Forwarding payload");
            scope
                .run(forwarder.to_pipeline.send(block))
                .await?
                .map_err(|_| EngineApiError::SyncPipelineClosed)?;
            forwarder.number_sent = block_number;
            forwarder.in_flight = Some(InFlight {
                hash: block_hash,
                number: block_number,
                head_number: head.best_number,
            });
            (head, from_pipeline)
        };

        // The pipeline reverse syncs from blocks that do not extend the head.
        let Some(mut from_pipeline) = from_pipeline else {
            debug!(
                target: "engine::coordinator",
                ?block_hash,
                ?parent_hash,
                head = ?head.best_hash,
                "Payload is not contiguous, commissioned for reverse sync"
            );
            return Ok(PayloadStatus::syncing(head.best_hash))
        };

        let status = Self::await_verdict(&mut from_pipeline, block_hash, scope).await?;
        drop(from_pipeline);
        self.forwarder.lock().await.settle(&status);
        if status.valid {
            Ok(PayloadStatus::new(PayloadStatusEnum::Valid, block_hash))
        } else {
            Ok(PayloadStatus::new(PayloadStatusEnum::Invalid, head.best_hash))
        }
    }

    /// Waits for the verdict on the given block, skipping verdicts on other blocks.
    async fn await_verdict(
        from_pipeline: &mut mpsc::Receiver<ExecutionStatus>,
        block_hash: BlockHash,
        scope: &WaitScope<'_>,
    ) -> EngineApiResult<ExecutionStatus> {
        loop {
            let status =
                scope.run(from_pipeline.recv()).await?.ok_or(EngineApiError::SyncPipelineClosed)?;
            if status.block_hash == block_hash {
                trace!(
                    target: "engine::coordinator",
                    ?block_hash,
                    valid = status.valid,
                    "Received verdict"
                );
                return Ok(status)
            }
            debug!(
                target: "engine::coordinator",
                expected = ?block_hash,
                received = ?status.block_hash,
                "Discarding stale verdict"
            );
        }
    }

    /// Settles verdicts that arrived after their submission stopped waiting.
    ///
    /// A submission still waiting holds the receiver, in which case nothing is drained.
    fn drain_verdicts(&self, forwarder: &mut Forwarder) {
        let Ok(mut from_pipeline) = self.from_pipeline.try_lock() else { return };
        while let Ok(status) = from_pipeline.try_recv() {
            if forwarder.settle(&status) {
                debug!(
                    target: "engine::coordinator",
                    block_hash = ?status.block_hash,
                    valid = status.valid,
                    number_sent = forwarder.number_sent,
                    "Settled verdict on abandoned payload"
                );
            } else {
                debug!(
                    target: "engine::coordinator",
                    received = ?status.block_hash,
                    "Discarding stale verdict"
                );
            }
        }
    }
}

/// The signals a blocking wait of a single submission observes.
#[derive(Debug)]
pub struct WaitScope<'a> {
    caller: &'a CancellationToken,
    shutdown: &'a CancellationToken,
    deadline: Option<Instant>,
}

impl<'a> WaitScope<'a> {
    /// Creates a scope ending at the given tokens or once `timeout` has passed.
    pub fn new(
        caller: &'a CancellationToken,
        shutdown: &'a CancellationToken,
        timeout: Option<Duration>,
    ) -> Self {
        Self { caller, shutdown, deadline: timeout.map(|timeout| Instant::now() + timeout) }
    }

    /// Runs `fut` to completion unless the scope ends first.
    pub async fn run<F: Future>(&self, fut: F) -> EngineApiResult<F::Output> {
        tokio::select! {
            biased;
            _ = self.caller.cancelled() => Err(EngineApiError::Cancelled(CancelReason::Caller)),
            _ = self.shutdown.cancelled() => Err(EngineApiError::Cancelled(CancelReason::Shutdown)),
            _ = deadline_elapsed(self.deadline) => {
                Err(EngineApiError::Cancelled(CancelReason::Timeout))
            }
            output = fut => Ok(output),
        }
    }
}

async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
