//! Error types for the `service` layer.
//!
//! The broadcast core itself cannot fail; these errors cover bringing the
//! process up and keeping the listener running.
use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The listener could not be bound to the configured address.
    Bind(String),
    /// The HTTP server stopped with an I/O error.
    Serve,
}

impl Error {
    pub fn bind(address: impl Into<String>, err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Bind(address.into()),
        }
    }

    pub fn serve(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Serve,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Bind(address) => write!(f, "failed to bind {address}")?,
            ErrorKind::Serve => write!(f, "server error")?,
        }
        match &self.source {
            Some(source) => write!(f, ": {source}"),
            None => Ok(()),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn bind_error_names_the_address_and_keeps_the_source() {
        let err = Error::bind(
            "127.0.0.1:4000",
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );

        assert_eq!(err.error_kind, ErrorKind::Bind("127.0.0.1:4000".to_string()));
        assert_eq!(
            err.to_string(),
            "failed to bind 127.0.0.1:4000: address in use"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn serve_error_display() {
        let err = Error::serve(io::Error::new(io::ErrorKind::Other, "reset"));
        assert_eq!(err.error_kind, ErrorKind::Serve);
        assert_eq!(err.to_string(), "server error: reset");
    }
}
