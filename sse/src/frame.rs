//! Encoding of logical events into `text/event-stream` wire bytes.
//!
//! A frame is a run of `<field>: <value>` lines joined by `\n` and terminated
//! by a blank line. Fields are always emitted in the order `event`, `data`,
//! `id`. A frame with empty `data` is encoded as a comment (a line starting
//! with `:`), which clients never dispatch to their message handlers.

use crate::message::Message;
use bytes::Bytes;

const EVENT_FIELD: &str = "event";
const DATA_FIELD: &str = "data";
const ID_FIELD: &str = "id";

/// The comment frame sent to keep idle connections open.
pub const KEEP_ALIVE: &[u8] = b":\n\n";

/// A logical server-sent event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub event: Option<String>,
    pub data: String,
    pub id: Option<String>,
}

impl Frame {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn encode(&self) -> Bytes {
        encode(self.event.as_deref(), &self.data, self.id.as_deref())
    }

    /// Encodes `text` as a comment frame, one `: ` line per physical line.
    pub fn comment(text: &str) -> Bytes {
        if text.is_empty() {
            return Bytes::from_static(KEEP_ALIVE);
        }

        let lines: Vec<String> = physical_lines(text)
            .map(|line| format!(": {line}"))
            .collect();
        finish(lines)
    }
}

impl From<&Message> for Frame {
    fn from(message: &Message) -> Self {
        Frame::new(message.as_str())
    }
}

/// Encodes one frame. Empty `data` produces a keep-alive comment regardless
/// of `event` and `id`; empty `event` or `id` values are omitted.
pub fn encode(event: Option<&str>, data: &str, id: Option<&str>) -> Bytes {
    if data.is_empty() {
        return Bytes::from_static(KEEP_ALIVE);
    }

    let mut lines = Vec::new();

    if let Some(event) = event.map(single_line).filter(|e| !e.is_empty()) {
        lines.push(format!("{EVENT_FIELD}: {event}"));
    }

    lines.extend(physical_lines(data).map(|line| format!("{DATA_FIELD}: {line}")));

    if let Some(id) = id.map(single_line).filter(|i| !i.is_empty()) {
        lines.push(format!("{ID_FIELD}: {id}"));
    }

    finish(lines)
}

fn finish(lines: Vec<String>) -> Bytes {
    let mut frame = lines.join("\n");
    frame.push_str("\n\n");
    Bytes::from(frame)
}

// Splits on `\r\n`, `\n` and lone `\r`, the three line terminators of the
// event-stream format. A trailing terminator yields a trailing empty line.
fn physical_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(index) => {
                let skip = if current[index..].starts_with("\r\n") {
                    2
                } else {
                    1
                };
                rest = Some(&current[index + skip..]);
                Some(&current[..index])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

// `event` and `id` cannot span lines on the wire.
fn single_line(value: &str) -> String {
    value.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}
