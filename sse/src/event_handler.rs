use crate::message::Message;
use crate::Manager;
use async_trait::async_trait;
use events::{EventHandler, WebhookEvent};
use log::*;
use std::sync::Arc;

/// Handles webhook events by broadcasting them to every connected stream.
///
/// The broadcast payload is the event name itself. Fan-out runs on its own
/// task, so handling returns as soon as the broadcast is dispatched.
pub struct SseBroadcastHandler {
    sse_manager: Arc<Manager>,
}

impl SseBroadcastHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }
}

#[async_trait]
impl EventHandler for SseBroadcastHandler {
    async fn handle(&self, event: &WebhookEvent) {
        debug!("Dispatching broadcast of {event}");
        self.sse_manager.spawn_notify(Message::from(event.name()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::EventPublisher;
    use std::time::Duration;

    #[tokio::test]
    async fn published_event_name_reaches_every_subscription() {
        let manager = Arc::new(Manager::new());
        let mut first = manager.register_subscription();
        let mut second = manager.register_subscription();

        let publisher =
            EventPublisher::new().with_handler(Arc::new(SseBroadcastHandler::new(manager.clone())));
        publisher
            .publish(WebhookEvent::new("edx.bi.user.account.registered"))
            .await;

        for subscription in [&mut first, &mut second] {
            let message = tokio::time::timeout(Duration::from_secs(5), subscription.next_message())
                .await
                .unwrap();
            assert_eq!(
                message,
                Some(Message::from("edx.bi.user.account.registered"))
            );
            assert_eq!(subscription.try_next_message(), None);
        }
    }
}
