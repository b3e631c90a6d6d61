#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! Strand RPC type definitions
//!
//! Provides all relevant types for the engine bridge exposed to the consensus driver.

mod eth;

pub use eth::*;
