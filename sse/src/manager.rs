use crate::broadcaster::{Broadcaster, Delivery};
use crate::message::Message;
use crate::registry::{SubscriberRegistry, DEFAULT_QUEUE_CAPACITY};
use crate::stream::event_stream;
use crate::subscription::Subscription;
use bytes::Bytes;
use futures::Stream;
use log::*;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct Manager {
    registry: Arc<SubscriberRegistry>,
    broadcaster: Broadcaster,
}

impl Manager {
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        let registry = SubscriberRegistry::with_queue_capacity(queue_capacity);
        Self {
            broadcaster: Broadcaster::new(Arc::clone(&registry)),
            registry,
        }
    }

    /// Register a new subscription. It stays registered until dropped.
    pub fn register_subscription(&self) -> Subscription {
        let subscription = self.registry.register();
        info!(
            "Registered new subscription {} ({} active)",
            subscription.id(),
            self.registry.len()
        );
        subscription
    }

    /// Open an event stream for a newly connected client.
    ///
    /// The subscription is primed with a keep-alive so the client sees a frame
    /// before any real event arrives.
    pub fn open_stream(
        &self,
        keep_alive: Option<Duration>,
    ) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
        let subscription = self.register_subscription();

        if let Err(e) = subscription.enqueue(Message::keep_alive()) {
            warn!(
                "Failed to prime subscription {} with a keep-alive: {}",
                subscription.id(),
                e
            );
        }

        event_stream(subscription, keep_alive)
    }

    /// Broadcast a message to every registered subscription.
    pub fn notify(&self, message: Message) -> Delivery {
        self.broadcaster.notify(message)
    }

    /// Broadcast without waiting for fan-out to finish.
    pub fn spawn_notify(&self, message: Message) -> JoinHandle<Delivery> {
        self.broadcaster.spawn_notify(message)
    }

    pub fn subscription_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::KEEP_ALIVE;
    use futures::StreamExt;

    #[tokio::test]
    async fn open_stream_starts_with_a_keep_alive() {
        let manager = Manager::new();
        let mut frames = Box::pin(manager.open_stream(None));

        assert_eq!(manager.subscription_count(), 1);
        assert_eq!(frames.next().await.unwrap().unwrap(), KEEP_ALIVE);
    }

    #[tokio::test]
    async fn two_streams_receive_the_same_broadcast() {
        let manager = Manager::new();
        let mut a = Box::pin(manager.open_stream(None));
        let mut b = Box::pin(manager.open_stream(None));
        assert_eq!(manager.subscription_count(), 2);

        let delivery = manager.notify(Message::from("edx.course.enrollment.activated"));
        assert_eq!(delivery.delivered, 2);

        for frames in [&mut a, &mut b] {
            assert_eq!(frames.next().await.unwrap().unwrap(), KEEP_ALIVE);
            assert_eq!(
                frames.next().await.unwrap().unwrap(),
                "data: edx.course.enrollment.activated\n\n"
            );
        }

        drop(a);
        assert_eq!(manager.subscription_count(), 1);

        let delivery = manager.notify(Message::from("Completed Order"));
        assert_eq!(delivery.delivered, 1);
        assert_eq!(
            b.next().await.unwrap().unwrap(),
            "data: Completed Order\n\n"
        );
    }

    #[test]
    fn register_subscription_counts_until_dropped() {
        let manager = Manager::default();
        let subscription = manager.register_subscription();
        assert_eq!(manager.subscription_count(), 1);

        drop(subscription);
        assert_eq!(manager.subscription_count(), 0);
    }
}
