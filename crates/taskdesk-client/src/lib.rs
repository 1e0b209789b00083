//! Client-side HTTP pipeline for the Taskdesk task-management API.
//!
//! [`ApiClient`] wraps every call in a fixed sequence of stages: bearer
//! credential injection, transport, then response classification with a
//! single credential refresh on 401, bounded backoff on 429/5xx and exactly
//! one user notification per unrecoverable failure.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod services;

pub use auth::{CredentialProvider, StaticCredentials};
pub use config::{ClientConfig, ConfigError, RetryPolicy};
pub use error::{ApiError, ApiResult};
pub use http::{ApiClient, HttpResponse, RequestDescriptor};
pub use notify::{Notification, Notifier, TracingNotifier};
pub use services::{ApiEnvelope, Task, TaskFilter, TaskService, UserProfile, UserService};
