use crate::message::Message;
use crate::registry::SubscriberRegistry;
use log::*;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Unique identifier for a subscription (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a message could not be queued for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// The subscriber's queue is at capacity; the message was dropped for it.
    Full,
    /// The subscriber's stream has gone away.
    Closed,
}

impl fmt::Display for EnqueueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EnqueueError::Full => write!(f, "subscriber queue is full"),
            EnqueueError::Closed => write!(f, "subscriber queue is closed"),
        }
    }
}

impl std::error::Error for EnqueueError {}

/// The producer side of a subscription, as held by the registry.
#[derive(Debug, Clone)]
pub struct SubscriberHandle {
    id: SubscriptionId,
    sequence: u64,
    sender: mpsc::Sender<Message>,
}

impl SubscriberHandle {
    pub(crate) fn new(id: SubscriptionId, sequence: u64, sender: mpsc::Sender<Message>) -> Self {
        Self {
            id,
            sequence,
            sender,
        }
    }

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Registration order within the owning registry.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Queues `message` without waiting. A full queue drops the message for
    /// this subscriber only.
    pub fn enqueue(&self, message: Message) -> Result<(), EnqueueError> {
        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => EnqueueError::Full,
            TrySendError::Closed(_) => EnqueueError::Closed,
        })
    }
}

/// A per-connection mailbox, owned by the stream that created it.
///
/// Dropping a `Subscription` removes it from its registry, so every exit path
/// of the owning stream (normal end, write error, cancellation) releases it.
pub struct Subscription {
    handle: SubscriberHandle,
    receiver: mpsc::Receiver<Message>,
    registry: Arc<SubscriberRegistry>,
}

impl Subscription {
    pub(crate) fn new(
        handle: SubscriberHandle,
        receiver: mpsc::Receiver<Message>,
        registry: Arc<SubscriberRegistry>,
    ) -> Self {
        Self {
            handle,
            receiver,
            registry,
        }
    }

    pub fn id(&self) -> &SubscriptionId {
        self.handle.id()
    }

    pub fn enqueue(&self, message: Message) -> Result<(), EnqueueError> {
        self.handle.enqueue(message)
    }

    /// Waits for the next queued message, in FIFO order.
    ///
    /// Cancel safe: dropping the returned future never loses a message.
    pub async fn next_message(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    /// Returns the next queued message without waiting.
    pub fn try_next_message(&mut self) -> Option<Message> {
        self.receiver.try_recv().ok()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", self.id())
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        info!("Subscription {} closed, unregistering", self.id());
        self.registry.unregister(self.handle.id());
    }
}
