//! User-facing notifications
//!
//! Every unrecoverable failure produces exactly one [`Notification`]. Rendering
//! is left to the host application through [`Notifier`].

use crate::http::response::{FailureKind, ResponseOutcome};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please login again.";
pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Too many requests. Please try again later.";
pub const FORBIDDEN_MESSAGE: &str = "You don't have permission to perform this action";
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your internet connection.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Display time for failure notices
pub const ERROR_TIMEOUT: Duration = Duration::from_millis(5000);
/// Display time for success notices
pub const SUCCESS_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub color: Color,
    pub position: Position,
    pub timeout: Duration,
}

impl Notification {
    pub fn negative(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            color: Color::Negative,
            position: Position::Top,
            timeout: ERROR_TIMEOUT,
        }
    }

    pub fn positive(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            color: Color::Positive,
            position: Position::Top,
            timeout: SUCCESS_TIMEOUT,
        }
    }
}

/// Renders notifications for the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Headless notifier that forwards everything to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.color {
            Color::Positive => tracing::info!(
                target: "taskdesk::notify",
                timeout_ms = %notification.timeout.as_millis(),
                "{}",
                notification.message
            ),
            Color::Negative => tracing::warn!(
                target: "taskdesk::notify",
                timeout_ms = %notification.timeout.as_millis(),
                "{}",
                notification.message
            ),
        }
    }
}

/// Message shown when `outcome` ends the request chain.
///
/// `None` means the outcome is rejected silently: a 401 that survived a
/// refreshed resubmission, or a non-error status outside 2xx.
pub fn failure_message(outcome: &ResponseOutcome) -> Option<String> {
    match outcome {
        Ok(response) => {
            let fallback = match response.status {
                403 => FORBIDDEN_MESSAGE,
                404 => NOT_FOUND_MESSAGE,
                429 => return Some(TOO_MANY_REQUESTS_MESSAGE.to_string()),
                s if s >= 500 => SERVER_ERROR_MESSAGE,
                401 => return None,
                s if s >= 400 => REQUEST_FAILED_MESSAGE,
                _ => return None,
            };
            Some(
                response
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback.to_string()),
            )
        }
        Err(failure) => match failure.kind {
            FailureKind::NoResponse => Some(NETWORK_ERROR_MESSAGE.to_string()),
            FailureKind::RequestConstruction => {
                if failure.cause.trim().is_empty() {
                    Some(UNEXPECTED_ERROR_MESSAGE.to_string())
                } else {
                    Some(failure.cause.clone())
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::{HttpResponse, TransportFailure};
    use serde_json::json;

    fn outcome(status: u16, body: serde_json::Value) -> ResponseOutcome {
        Ok(HttpResponse::new(status, body))
    }

    #[test]
    fn test_status_defaults() {
        let null = serde_json::Value::Null;
        assert_eq!(failure_message(&outcome(403, null.clone())).unwrap(), FORBIDDEN_MESSAGE);
        assert_eq!(failure_message(&outcome(404, null.clone())).unwrap(), NOT_FOUND_MESSAGE);
        assert_eq!(failure_message(&outcome(503, null.clone())).unwrap(), SERVER_ERROR_MESSAGE);
        assert_eq!(failure_message(&outcome(422, null.clone())).unwrap(), REQUEST_FAILED_MESSAGE);
        assert_eq!(failure_message(&outcome(401, null.clone())), None);
        assert_eq!(failure_message(&outcome(304, null)), None);
    }

    #[test]
    fn test_server_message_wins() {
        let msg = failure_message(&outcome(404, json!({"success": false, "message": "Task not found"})));
        assert_eq!(msg.as_deref(), Some("Task not found"));

        // empty message falls back to the default
        let msg = failure_message(&outcome(500, json!({"message": ""})));
        assert_eq!(msg.as_deref(), Some(SERVER_ERROR_MESSAGE));
    }

    #[test]
    fn test_rate_limit_text_is_fixed() {
        let msg = failure_message(&outcome(429, json!({"message": "slow down"})));
        assert_eq!(msg.as_deref(), Some(TOO_MANY_REQUESTS_MESSAGE));
    }

    #[test]
    fn test_transport_failures() {
        let msg = failure_message(&Err(TransportFailure::no_response("connection refused")));
        assert_eq!(msg.as_deref(), Some(NETWORK_ERROR_MESSAGE));

        let msg = failure_message(&Err(TransportFailure::construction("Invalid HTTP method: G ET")));
        assert_eq!(msg.as_deref(), Some("Invalid HTTP method: G ET"));

        let msg = failure_message(&Err(TransportFailure::construction("")));
        assert_eq!(msg.as_deref(), Some(UNEXPECTED_ERROR_MESSAGE));
    }

    #[test]
    fn test_notification_presets() {
        let n = Notification::negative("x");
        assert_eq!(n.color, Color::Negative);
        assert_eq!(n.position, Position::Top);
        assert_eq!(n.timeout, Duration::from_millis(5000));

        let p = Notification::positive("y");
        assert_eq!(p.color, Color::Positive);
        assert_eq!(p.timeout, Duration::from_millis(3000));
    }
}
