//! Per-attempt timeout enforcement for the transport

use crate::http::response::TransportFailure;
use reqwest::ClientBuilder;
use std::time::Duration;
use tokio::time::timeout;

/// Applies one deadline to a whole transport attempt (send and body read)
#[derive(Debug, Clone)]
pub struct TimeoutManager {
    request_timeout: Duration,
}

impl TimeoutManager {
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Connection establishment never gets more time than the attempt itself
    pub fn apply_to_client_builder(&self, builder: ClientBuilder) -> ClientBuilder {
        builder.connect_timeout(self.request_timeout)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Run `operation` under the attempt deadline, mapping every failure to
    /// the transport failure taxonomy.
    pub async fn execute_with_timeout<F, T>(&self, operation: F) -> Result<T, TransportFailure>
    where
        F: std::future::Future<Output = Result<T, reqwest::Error>>,
    {
        match timeout(self.request_timeout, operation).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(classify_reqwest_error(&err, self.request_timeout)),
            Err(_) => Err(TransportFailure::no_response(format!(
                "Request timed out after {}ms",
                self.request_timeout.as_millis()
            ))),
        }
    }
}

fn classify_reqwest_error(err: &reqwest::Error, request_timeout: Duration) -> TransportFailure {
    if err.is_builder() {
        TransportFailure::construction(err.to_string())
    } else if err.is_timeout() {
        TransportFailure::no_response(format!(
            "Request timed out after {}ms",
            request_timeout.as_millis()
        ))
    } else if err.is_connect() {
        TransportFailure::no_response(format!("Connection failed: {}", err))
    } else {
        TransportFailure::no_response(err.to_string())
    }
}
