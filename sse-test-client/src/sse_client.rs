use crate::auth::Credentials;
use anyhow::Result;
use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum Received {
    /// A comment frame
    KeepAlive,
    Message(Event),
}

#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub data: String,
    pub timestamp: Instant,
}

pub struct Connection {
    pub label: String,
    event_rx: mpsc::UnboundedReceiver<Received>,
    handle: tokio::task::JoinHandle<()>,
}

impl Connection {
    pub async fn establish(
        base_url: &str,
        credentials: Option<&Credentials>,
        label: String,
    ) -> Result<Self> {
        let url = format!("{}/stream", base_url);
        let (tx, rx) = mpsc::unbounded_channel();

        let mut builder = es::ClientBuilder::for_url(&url)?;
        if let Some(credentials) = credentials {
            builder = builder.header("Authorization", &credentials.header_value())?;
        }
        let client = builder.build();

        let stream_label = label.clone();
        let handle = tokio::spawn(async move {
            let mut stream = client.stream();

            loop {
                let received = match stream.next().await {
                    Some(Ok(es::SSE::Event(event))) => Received::Message(Event {
                        event_type: event.event_type,
                        data: event.data,
                        timestamp: Instant::now(),
                    }),
                    Some(Ok(es::SSE::Comment(_))) => Received::KeepAlive,
                    Some(Err(e)) => {
                        warn!("SSE error for {}: {}", stream_label, e);
                        continue;
                    }
                    None => {
                        debug!("SSE stream ended for {}", stream_label);
                        break;
                    }
                };

                if tx.send(received).is_err() {
                    debug!("SSE receiver dropped for {}", stream_label);
                    break;
                }
            }
        });

        Ok(Self {
            label,
            event_rx: rx,
            handle,
        })
    }

    pub async fn wait_for_keep_alive(&mut self, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.event_rx.recv()).await {
            Ok(Some(Received::KeepAlive)) => Ok(()),
            Ok(Some(Received::Message(event))) => {
                anyhow::bail!("Expected a keep-alive, got message {:?}", event.data)
            }
            Ok(None) => anyhow::bail!("SSE connection closed"),
            Err(_) => anyhow::bail!("Timeout waiting for keep-alive"),
        }
    }

    /// Wait for the next message, skipping keep-alives.
    pub async fn wait_for_message(&mut self, timeout: Duration) -> Result<Event> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                anyhow::bail!("Timeout waiting for message");
            }

            match tokio::time::timeout(remaining, self.event_rx.recv()).await {
                Ok(Some(Received::Message(event))) => return Ok(event),
                Ok(Some(Received::KeepAlive)) => continue,
                Ok(None) => anyhow::bail!("SSE connection closed"),
                Err(_) => anyhow::bail!("Timeout waiting for message"),
            }
        }
    }

    /// Returns the first message received within `period`, if any.
    pub async fn message_within(&mut self, period: Duration) -> Option<Event> {
        self.wait_for_message(period).await.ok()
    }

    /// Disconnect from the hub.
    pub fn close(self) {
        self.handle.abort();
    }
}
