//! The per-connection streaming loop.
//!
//! A stream moves through three states:
//!
//! - `CONNECTING`: [`Manager::open_stream`](crate::Manager::open_stream)
//!   registers a subscription and primes it with a keep-alive message.
//! - `STREAMING`: every queued message is encoded and yielded, in queue order.
//!   With a keep-alive period configured, a keep-alive frame is also yielded
//!   whenever the queue stays idle for that long.
//! - `CLOSED`: the stream is dropped (the client went away or the response
//!   body was torn down). The subscription it owns is dropped with it and
//!   unregisters itself.

use crate::frame::Frame;
use crate::message::Message;
use crate::subscription::Subscription;
use async_stream::stream;
use bytes::Bytes;
use futures::Stream;
use log::*;
use std::convert::Infallible;
use std::time::Duration;
use tokio::time::timeout;

/// Turns a subscription into a stream of encoded frames. The subscription is
/// owned by the returned stream, even before it is first polled.
pub fn event_stream(
    mut subscription: Subscription,
    keep_alive: Option<Duration>,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    stream! {
        loop {
            let next = match keep_alive {
                Some(period) => match timeout(period, subscription.next_message()).await {
                    Ok(message) => message,
                    Err(_) => Some(Message::keep_alive()),
                },
                None => subscription.next_message().await,
            };

            let Some(message) = next else {
                break;
            };

            yield Ok::<Bytes, Infallible>(Frame::from(&message).encode());
        }

        debug!("Event stream for subscription {} ended", subscription.id());
    }
}
