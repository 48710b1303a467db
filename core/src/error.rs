//! Error types for the myrunes API gateway.
//!
//! # Design
//! Only two failure kinds come from the wire: the transport could not
//! produce a response at all (`Transport`), or the server answered with a
//! status of 400 or above (`Application`). The application variant keeps the
//! decoded body and the response headers as separate fields instead of
//! grafting the headers onto a payload this crate does not own.
//!
//! `Decode` and `Serialization` cover local JSON failures: a success body
//! that is not JSON, a typed view that does not match, or a request DTO that
//! cannot be encoded.
//! `InvalidIdentifier` is raised before any I/O for empty, `.` or `..` path
//! identifiers.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::http::find_header;

/// Error produced by a `Transport` when no response was received.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by every `Gateway` operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connect, DNS, IO).
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    /// The server responded with a status of 400 or above.
    #[error("{0}")]
    Application(ApplicationFailure),

    /// A response body could not be decoded.
    #[error("deserialization failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A path identifier that cannot be sent as its own segment.
    #[error("invalid path identifier: {0:?}")]
    InvalidIdentifier(String),
}

impl ApiError {
    /// HTTP status of an application failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Application(failure) => Some(failure.status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn as_application(&self) -> Option<&ApplicationFailure> {
        match self {
            ApiError::Application(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A response with status >= 400.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationFailure {
    pub status: u16,
    /// Decoded error body. Empty bodies decode to `Null`; bodies that are not
    /// JSON are kept as `Value::String`.
    pub body: Value,
    pub headers: Vec<(String, String)>,
}

impl ApplicationFailure {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The `message` field of the server's `{code, message}` error body.
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        T::deserialize(&self.body).map_err(ApiError::Decode)
    }
}

impl std::fmt::Display for ApplicationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Some(message) => write!(f, "HTTP {}: {message}", self.status),
            None => write!(f, "HTTP {}: {}", self.status, self.body),
        }
    }
}
