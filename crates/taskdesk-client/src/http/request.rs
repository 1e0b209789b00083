//! Request descriptor: one logical API call plus its retry bookkeeping

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Retry bookkeeping attached to a descriptor by the pipeline.
///
/// These counters are the only record of how often a call has been retried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    /// Set once the single credential refresh for this call has been used
    pub auth_retry_attempted: bool,
    /// Retries spent on rate limiting and server errors (bounded)
    pub server_retry_count: u32,
}

/// A mutable description of one HTTP call
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Option<JsonValue>,
    retry: RetryState,
}

impl RequestDescriptor {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            retry: RetryState::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new("PUT", path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new("PATCH", path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new("DELETE", path)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON payload
    pub fn with_json<T: Serialize>(self, body: &T) -> serde_json::Result<Self> {
        Ok(self.with_body(serde_json::to_value(body)?))
    }

    /// Set a header, replacing any existing entry with the same name in a
    /// different case.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_string(), value.into());
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn retry_state(&self) -> RetryState {
        self.retry
    }

    pub(crate) fn retry_state_mut(&mut self) -> &mut RetryState {
        &mut self.retry
    }
}
