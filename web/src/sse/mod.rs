//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the stream endpoint.
//! The broadcast core (Manager, SubscriberRegistry, frame encoding) lives in
//! the `sse` crate.

pub mod handler;
