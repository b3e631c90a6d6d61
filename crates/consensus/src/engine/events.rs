//! Fan out of newly canonical headers to streaming subscribers.

use parking_lot::Mutex;
use std::{collections::HashMap, fmt};
use strand_primitives::Header;
use strand_rpc_types::SubscribeReply;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::trace;

/// Callback invoked for every new canonical header.
///
/// Returning an error removes the callback from the registry.
pub type HeaderSubscription = Box<dyn FnMut(&Header) -> Result<(), SinkError> + Send>;

/// Identifier of a registered header subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Failure to hand an event to a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The subscriber went away.
    #[error("subscriber disconnected")]
    Closed,
    /// The subscriber does not keep up.
    #[error("subscriber is lagging behind")]
    Full,
}

/// Destination of a header stream.
///
/// A write must not block: a sink that cannot take the event right away fails and is dropped.
pub trait HeaderSink: Send + 'static {
    /// Attempts to write one event.
    fn try_send(&self, reply: SubscribeReply) -> Result<(), SinkError>;
}

impl HeaderSink for mpsc::Sender<SubscribeReply> {
    fn try_send(&self, reply: SubscribeReply) -> Result<(), SinkError> {
        Self::try_send(self, reply).map_err(|err| match err {
            TrySendError::Full(_) => SinkError::Full,
            TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}

impl HeaderSink for mpsc::UnboundedSender<SubscribeReply> {
    fn try_send(&self, reply: SubscribeReply) -> Result<(), SinkError> {
        self.send(reply).map_err(|_| SinkError::Closed)
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    headers: HashMap<SubscriptionId, HeaderSubscription>,
}

/// Registry of header subscriptions, fed by the component that makes headers canonical.
#[derive(Default)]
pub struct Events {
    registry: Mutex<Registry>,
}

impl fmt::Debug for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Events")
            .field("header_subscriptions", &self.registry.lock().headers.len())
            .finish()
    }
}

impl Events {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for new canonical headers.
    pub fn add_header_subscription(&self, subscription: HeaderSubscription) -> SubscriptionId {
        let mut registry = self.registry.lock();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.headers.insert(id, subscription);
        id
    }

    /// Removes a subscription, returns false if it was already gone.
    pub fn remove_header_subscription(&self, id: SubscriptionId) -> bool {
        self.registry.lock().headers.remove(&id).is_some()
    }

    /// Number of registered header subscriptions.
    pub fn header_subscriptions(&self) -> usize {
        self.registry.lock().headers.len()
    }

    /// Delivers a new canonical header to every subscriber.
    ///
    /// Must be called in the order headers become canonical. Subscribers failing the delivery
    /// are removed.
    pub fn on_new_header(&self, header: &Header) {
        self.registry.lock().headers.retain(|id, subscription| match subscription(header) {
            Ok(()) => true,
            Err(err) => {
                trace!(target: "engine::events", %id, %err, "Dropping header subscription");
                false
            }
        });
    }
}
