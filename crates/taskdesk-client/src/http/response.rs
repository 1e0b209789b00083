//! Outcome of a single transport attempt

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;

/// Response received from the server, whatever its status
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are stored lower-cased
    pub headers: HashMap<String, String>,
    pub body: JsonValue,
}

impl HttpResponse {
    pub fn new(status: u16, body: JsonValue) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The application envelope's `message` field, when present and non-empty
    pub fn server_message(&self) -> Option<&str> {
        self.body
            .get("message")
            .and_then(JsonValue::as_str)
            .filter(|m| !m.is_empty())
    }

    /// Decode the body into a typed value
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request went out (or tried to) but nothing came back
    NoResponse,
    /// The request could not be built
    RequestConstruction,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NoResponse => write!(f, "no response"),
            FailureKind::RequestConstruction => write!(f, "request construction error"),
        }
    }
}

/// Transport-level failure: no response object exists
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {cause}")]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub cause: String,
}

impl TransportFailure {
    pub fn no_response(cause: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::NoResponse,
            cause: cause.into(),
        }
    }

    pub fn construction(cause: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::RequestConstruction,
            cause: cause.into(),
        }
    }
}

pub type ResponseOutcome = Result<HttpResponse, TransportFailure>;
