//! Server-Sent Events (SSE) broadcast hub.
//!
//! This crate provides the subscription lifecycle, the concurrent fan-out and
//! the wire framing behind the hub's `/stream` endpoint.
//!
//! # Architecture
//!
//! - **One subscription per connection**: every open stream owns a
//!   [`Subscription`], a bounded FIFO mailbox of pending [`Message`]s.
//! - **Registry**: [`SubscriberRegistry`] holds the producer side of every live
//!   subscription in a DashMap. A subscription unregisters itself when dropped,
//!   so a closed connection can never stay registered.
//! - **Broadcast**: [`Broadcaster::notify`] queues a message for every
//!   subscription in a point-in-time snapshot. A full or closed queue only
//!   costs that one subscriber the message.
//! - **Ephemeral messages**: nothing is persisted; a client that is not
//!   connected misses the event.
//!
//! # Message Flow
//!
//! 1. A client opens `/stream`; the web layer calls [`Manager::open_stream`]
//! 2. The subscription is registered and primed with a keep-alive
//! 3. A webhook hits `/publish`; a matching event is published to the
//!    [`SseBroadcastHandler`], which calls [`Manager::notify`]
//! 4. Each stream dequeues the message, encodes it with [`frame::encode`] and
//!    writes the frame to its client
//!
//! # Modules
//!
//! - `frame`: event-stream wire encoding
//! - `message`: the broadcast payload
//! - `subscription`: per-connection mailbox and its registry handle
//! - `registry`: concurrent set of live subscriptions
//! - `broadcaster`: fan-out over a registry snapshot
//! - `stream`: the per-connection streaming loop
//! - `manager`: high-level entry point used by the web layer
//! - `event_handler`: bridge from webhook events to broadcasts

pub mod broadcaster;
pub mod event_handler;
pub mod frame;
pub mod manager;
pub mod message;
pub mod registry;
pub mod stream;
pub mod subscription;

pub use broadcaster::{Broadcaster, Delivery};
pub use event_handler::SseBroadcastHandler;
pub use frame::Frame;
pub use manager::Manager;
pub use message::Message;
pub use registry::SubscriberRegistry;
pub use subscription::{EnqueueError, SubscriberHandle, Subscription, SubscriptionId};
