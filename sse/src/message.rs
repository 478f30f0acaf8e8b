use std::fmt;
use std::sync::Arc;

/// An opaque payload broadcast to every subscription.
///
/// The payload is reference counted so a single broadcast can be queued for
/// many subscribers without copying it. An empty payload is the keep-alive
/// signal and encodes to a comment frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message(Arc<str>);

impl Message {
    pub fn new(payload: impl Into<Arc<str>>) -> Self {
        Self(payload.into())
    }

    pub fn keep_alive() -> Self {
        Self(Arc::from(""))
    }

    pub fn is_keep_alive(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Message {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl From<String> for Message {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
