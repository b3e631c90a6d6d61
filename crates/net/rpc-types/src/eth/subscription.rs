use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

/// Kind of event delivered over a subscription stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum EventKind {
    /// A header became canonical.
    Header,
}

/// A single message written to a subscriber.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeReply {
    /// What the payload describes.
    #[serde(rename = "type")]
    pub event: EventKind,
    /// RLP encoded event body.
    pub data: Bytes,
}

impl SubscribeReply {
    /// A reply carrying an RLP encoded header.
    pub const fn header(data: Bytes) -> Self {
        Self { event: EventKind::Header, data }
    }
}
