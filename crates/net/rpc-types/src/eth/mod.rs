//! Engine facing types

mod backend;
pub mod engine;
mod subscription;

pub use backend::{BlockReply, VersionReply};
pub use subscription::{EventKind, SubscribeReply};
