use crate::message::Message;
use crate::registry::SubscriberRegistry;
use crate::subscription::EnqueueError;
use log::*;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Outcome of one broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Subscribers the message was queued for.
    pub delivered: usize,
    /// Subscribers that could not take the message (full queue or gone).
    pub dropped: usize,
}

/// Fans a message out to every registered subscription.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<SubscriberRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self { registry }
    }

    /// Queue `message` for every subscription in a snapshot of the registry - O(n)
    ///
    /// Never waits on a subscriber: a subscriber that cannot take the message
    /// is skipped and the rest still receive it.
    pub fn notify(&self, message: Message) -> Delivery {
        let mut delivery = Delivery::default();

        for handle in self.registry.snapshot() {
            match handle.enqueue(message.clone()) {
                Ok(()) => delivery.delivered += 1,
                Err(EnqueueError::Closed) => {
                    // Stream is tearing down and will unregister itself
                    debug!("Skipping closed subscription {}", handle.id());
                    delivery.dropped += 1;
                }
                Err(e) => {
                    warn!(
                        "Failed to enqueue broadcast for subscription {}: {}. Message dropped for this subscriber.",
                        handle.id(),
                        e
                    );
                    delivery.dropped += 1;
                }
            }
        }

        delivery
    }

    /// Run [`Broadcaster::notify`] as its own task so the caller never waits
    /// on fan-out. Dropping the returned handle detaches the task.
    pub fn spawn_notify(&self, message: Message) -> JoinHandle<Delivery> {
        let broadcaster = self.clone();
        tokio::spawn(async move {
            let delivery = broadcaster.notify(message);
            debug!(
                "Broadcast delivered to {} subscription(s), {} dropped",
                delivery.delivered, delivery.dropped
            );
            delivery
        })
    }
}
