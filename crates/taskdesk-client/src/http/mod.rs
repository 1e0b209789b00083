pub mod interceptor;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod retry_manager;
pub mod scheduler;
pub mod timeout_manager;
pub mod transport;
pub mod url_builder;

#[cfg(test)]
pub(crate) mod testing;


pub use interceptor::{BearerAuthInjector, RequestInterceptor};
pub use pipeline::ApiClient;
pub use request::{RequestDescriptor, RetryState};
pub use response::{FailureKind, HttpResponse, ResponseOutcome, TransportFailure};
pub use retry_manager::{ErrorClassification, RetryAttempt, RetryDecision, RetryManager};
pub use scheduler::{RetryScheduler, ScheduledRetry, TokioScheduler};
pub use timeout_manager::TimeoutManager;
pub use transport::{ReqwestTransport, Transport};
pub use url_builder::UrlBuilder;
