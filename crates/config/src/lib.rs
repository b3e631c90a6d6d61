//! Standalone crate for strand configuration types.

#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

pub mod config;

pub use config::{EngineConfig, EvictionPolicy, PayloadStoreConfig};
