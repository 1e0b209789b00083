//! Typed calls over [`ApiClient`](crate::http::ApiClient)
//!
//! Every endpoint answers with a `{ "success": bool, "message": ... }`
//! envelope. Pipeline failures have already been reported by the time they
//! reach this layer, so services only report envelopes that come back with
//! `success: false`.

pub mod tasks;
pub mod user;

pub use tasks::{NewTask, Task, TaskFilter, TaskService, TaskUpdate};
pub use user::{ProfileUpdate, UserProfile, UserService};

use crate::error::{ApiError, ApiResult};
use crate::http::HttpResponse;
use crate::notify::{Notification, Notifier};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Standard response envelope; endpoint payload fields sit beside `success`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

/// Unwrap a successful envelope or report and reject a declined one.
///
/// `fallback` is used when the server declines without a message.
pub(crate) fn open_envelope<T: DeserializeOwned>(
    response: &HttpResponse,
    fallback: &str,
    notifier: &dyn Notifier,
) -> ApiResult<ApiEnvelope<T>> {
    let accepted = response
        .body
        .get("success")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if !accepted {
        let message = response
            .server_message()
            .unwrap_or(fallback)
            .to_string();
        tracing::warn!(http_status = response.status, message = %message, "Request declined by server");
        notifier.notify(Notification::negative(message.clone()));
        return Err(ApiError::Rejected(message));
    }

    Ok(response.json::<ApiEnvelope<T>>()?)
}
