use lru::LruCache;
use parking_lot::Mutex;
use strand_config::{EvictionPolicy, PayloadStoreConfig};
use strand_rpc_types::engine::{ExecutionPayload, PayloadId};

/// Payloads assembled by the local block builder, kept until the driver fetches them.
#[derive(Debug)]
pub struct PayloadStore {
    eviction: EvictionPolicy,
    payloads: Mutex<LruCache<PayloadId, ExecutionPayload>>,
}

impl PayloadStore {
    /// Creates an empty store with the configured eviction policy.
    pub fn new(config: PayloadStoreConfig) -> Self {
        let payloads = match config.eviction {
            EvictionPolicy::Never | EvictionPolicy::OnFetch => LruCache::unbounded(),
            EvictionPolicy::Capacity(capacity) => LruCache::new(capacity),
        };
        Self { eviction: config.eviction, payloads: Mutex::new(payloads) }
    }

    /// Stores a payload, returning the one previously stored under the same id.
    pub fn insert(&self, id: PayloadId, payload: ExecutionPayload) -> Option<ExecutionPayload> {
        self.payloads.lock().put(id, payload)
    }

    /// Returns the payload stored under `id`.
    ///
    /// With [`EvictionPolicy::OnFetch`] the payload is removed.
    pub fn get(&self, id: &PayloadId) -> Option<ExecutionPayload> {
        let mut payloads = self.payloads.lock();
        match self.eviction {
            EvictionPolicy::OnFetch => payloads.pop(id),
            EvictionPolicy::Never | EvictionPolicy::Capacity(_) => payloads.get(id).cloned(),
        }
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.payloads.lock().len()
    }

    /// Returns true if no payload is stored.
    pub fn is_empty(&self) -> bool {
        self.payloads.lock().is_empty()
    }
}

impl Default for PayloadStore {
    fn default() -> Self {
        Self::new(PayloadStoreConfig::default())
    }
}
