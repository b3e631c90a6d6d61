#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! Bridge between the consensus driver and the block import pipeline.
//!
//! The [`EngineApi`] turns execution payloads back into blocks, checks their integrity and hands
//! them to the sync pipeline one at a time. Blocks that do not extend the canonical head are
//! forwarded for reverse sync and answered with `SYNCING`, contiguous ones wait for the
//! pipeline's verdict.

/// The engine API and its building blocks.
pub mod engine;

pub use engine::{
    sync_channels, CancelReason, EngineApi, EngineApiError, EngineApiResult, Events, HeaderSink,
    PayloadStore, SinkError, SubscriptionId, SyncCoordinator, SyncPipelineChannels,
};
