//! Event system infrastructure for the SSE hub.
//!
//! This crate provides the event system that decouples webhook ingestion from
//! the infrastructure that fans events out to connected streams.
//!
//! # Architecture
//!
//! - **WebhookEvent**: a named event extracted from an inbound webhook payload
//! - **TriggerSet**: the whitelist of event names that cause a broadcast
//! - **EventHandler**: trait for implementing event handlers
//! - **EventPublisher**: publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates, avoiding circular
//! dependencies between `sse`, `service` and `web`.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Name of the JSON field carrying the event name in a webhook payload.
pub const EVENT_FIELD: &str = "event";

/// A named event delivered by an external webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    name: String,
}

impl WebhookEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Extracts the event from a raw webhook body.
    ///
    /// The body is parsed leniently: anything that is not a JSON object with a
    /// non-empty string `event` field yields `None` rather than an error, so a
    /// malformed delivery is indistinguishable from a non-matching one.
    pub fn from_payload(body: &[u8]) -> Option<Self> {
        let payload: Value = serde_json::from_slice(body).ok()?;

        payload
            .get(EVENT_FIELD)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(Self::new)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Set of event names that gate whether a webhook event is broadcast.
///
/// An empty set matches every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerSet {
    names: HashSet<String>,
}

impl TriggerSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| !name.is_empty())
                .collect(),
        }
    }

    /// A trigger set without a filter; every event matches.
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn is_match_all(&self) -> bool {
        self.names.is_empty()
    }

    pub fn matches(&self, event: &WebhookEvent) -> bool {
        self.is_match_all() || self.names.contains(event.name())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Trait for handling webhook events.
/// Implementations can perform side effects like broadcasting notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &WebhookEvent);
}

/// Publishes webhook events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers, sequentially.
    pub async fn publish(&self, event: WebhookEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingHandler {
        label: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &WebhookEvent) {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, event.name()));
        }
    }

    #[test]
    fn from_payload_extracts_event_name() {
        let event =
            WebhookEvent::from_payload(br#"{"event":"Completed Order","userId":"42"}"#).unwrap();
        assert_eq!(event.name(), "Completed Order");
    }

    #[test]
    fn from_payload_treats_malformed_bodies_as_no_event() {
        assert_eq!(WebhookEvent::from_payload(b""), None);
        assert_eq!(WebhookEvent::from_payload(b"not json"), None);
        assert_eq!(WebhookEvent::from_payload(br#"["event"]"#), None);
        assert_eq!(WebhookEvent::from_payload(br#"{"name":"x"}"#), None);
        assert_eq!(WebhookEvent::from_payload(br#"{"event":42}"#), None);
        assert_eq!(WebhookEvent::from_payload(br#"{"event":null}"#), None);
        assert_eq!(WebhookEvent::from_payload(br#"{"event":""}"#), None);
    }

    #[test]
    fn empty_trigger_set_matches_everything() {
        let triggers = TriggerSet::match_all();
        assert!(triggers.is_match_all());
        assert!(triggers.matches(&WebhookEvent::new("anything.at.all")));
    }

    #[test]
    fn trigger_set_only_matches_members() {
        let triggers = TriggerSet::new(["edx.course.enrollment.activated", "Completed Order"]);
        assert_eq!(triggers.len(), 2);
        assert!(triggers.matches(&WebhookEvent::new("Completed Order")));
        assert!(!triggers.matches(&WebhookEvent::new("completed order")));
        assert!(!triggers.matches(&WebhookEvent::new("edx.bi.user.account.registered")));
    }

    #[test]
    fn trigger_set_ignores_blank_names() {
        // `--trigger-events ""` arrives as a single empty name
        let triggers = TriggerSet::new([""]);
        assert!(triggers.is_match_all());
    }

    #[tokio::test]
    async fn publish_calls_handlers_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let publisher = EventPublisher::new()
            .with_handler(Arc::new(RecordingHandler {
                label: "first",
                seen: seen.clone(),
            }))
            .with_handler(Arc::new(RecordingHandler {
                label: "second",
                seen: seen.clone(),
            }));

        assert_eq!(publisher.handler_count(), 2);
        publisher.publish(WebhookEvent::new("ping")).await;

        assert_eq!(*seen.lock().unwrap(), vec!["first:ping", "second:ping"]);
    }

    #[tokio::test]
    async fn with_handler_does_not_affect_existing_clones() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = EventPublisher::default();
        let extended = base.clone().with_handler(Arc::new(RecordingHandler {
            label: "only",
            seen: seen.clone(),
        }));

        base.publish(WebhookEvent::new("ignored")).await;
        extended.publish(WebhookEvent::new("seen")).await;

        assert_eq!(*seen.lock().unwrap(), vec!["only:seen"]);
    }
}
