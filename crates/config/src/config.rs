//! Configuration files.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::{num::NonZeroUsize, path::Path, time::Duration};

/// Total difficulty at which mainnet switched to proof-of-stake.
pub const MAINNET_TERMINAL_TOTAL_DIFFICULTY: U256 =
    U256::from_limbs([0xd808_a128_d738_0000, 0x0c70, 0, 0]);

/// Configuration for the engine bridge.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Difficulty threshold of the transition to proof-of-stake.
    ///
    /// Without it the chain is not a proof-of-stake chain and every payload operation is
    /// refused.
    pub terminal_total_difficulty: Option<U256>,
    /// Builder payload cache configuration.
    pub payload_store: PayloadStoreConfig,
    /// How long a submission waits for the sync pipeline to judge a forwarded block.
    ///
    /// Unset means the wait only ends on a verdict or cancellation.
    #[serde(with = "humantime_serde")]
    pub verdict_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            terminal_total_difficulty: Some(MAINNET_TERMINAL_TOTAL_DIFFICULTY),
            payload_store: PayloadStoreConfig::default(),
            verdict_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Returns true if a terminal total difficulty is configured.
    pub const fn is_post_merge(&self) -> bool {
        self.terminal_total_difficulty.is_some()
    }

    /// Sets the terminal total difficulty.
    pub fn with_terminal_total_difficulty(mut self, ttd: Option<U256>) -> Self {
        self.terminal_total_difficulty = ttd;
        self
    }

    /// Sets the verdict timeout.
    pub fn with_verdict_timeout(mut self, timeout: Duration) -> Self {
        self.verdict_timeout = Some(timeout);
        self
    }

    /// Sets the payload eviction policy.
    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.payload_store.eviction = eviction;
        self
    }

    /// Loads the configuration from the given TOML file, writing the defaults if it is missing.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, confy::ConfyError> {
        confy::load_path(path)
    }

    /// Stores the configuration as TOML at the given path.
    pub fn store_path(&self, path: impl AsRef<Path>) -> Result<(), confy::ConfyError> {
        confy::store_path(path, self)
    }
}

/// Builder payload cache configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct PayloadStoreConfig {
    /// When cached payloads are dropped.
    pub eviction: EvictionPolicy,
}

/// Lifecycle of payloads held for the driver.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvictionPolicy {
    /// Payloads stay until their id is overwritten.
    #[default]
    Never,
    /// A payload is removed once it has been fetched.
    OnFetch,
    /// At most this many payloads are kept, the least recently used one is evicted first.
    Capacity(NonZeroUsize),
}
