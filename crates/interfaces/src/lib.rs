#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! Strand interface bindings
//!
//! Traits and types describing the collaborators of the engine bridge. The storage layer knows
//! the canonical head and serves stored blocks. The sync pipeline judges forwarded blocks, and
//! the node backend answers trivial queries.

/// Node backend accessors.
pub mod backend;

/// Possible errors when interacting with the chain.
mod error;
pub use error::{StrandError, StrandResult};

/// Provider traits and errors.
pub mod provider;

/// Types exchanged with the sync pipeline.
pub mod sync;

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers for mocking out the storage layer and the node backend.
pub mod test_utils;
