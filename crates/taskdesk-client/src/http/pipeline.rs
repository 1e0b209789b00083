//! Interception pipeline
//!
//! Every call runs: outbound interceptors -> transport -> inbound decision.
//! A decision to retry resubmits the same [`RequestDescriptor`] through the
//! whole pipeline again, so the loop below is bounded only by the counters
//! carried on the descriptor.

use crate::auth::{CredentialProvider, LOGIN_PATH};
use crate::config::{ClientConfig, RetryPolicy};
use crate::error::{ApiError, ApiResult};
use crate::http::interceptor::{set_bearer, BearerAuthInjector, RequestInterceptor};
use crate::http::request::RequestDescriptor;
use crate::http::response::{FailureKind, HttpResponse, ResponseOutcome, TransportFailure};
use crate::http::retry_manager::{ErrorClassification, RetryDecision, RetryManager};
use crate::http::scheduler::{RetryScheduler, TokioScheduler};
use crate::http::transport::{ReqwestTransport, Transport};
use crate::notify::{failure_message, Notification, Notifier, SESSION_EXPIRED_MESSAGE};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Resilient API client: credential injection, refresh, bounded retries and
/// one notification per unrecoverable failure.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialProvider>,
    notifier: Arc<dyn Notifier>,
    scheduler: Arc<dyn RetryScheduler>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    retry_manager: RetryManager,
}

impl ApiClient {
    /// Client backed by `reqwest` and `tokio` timers
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> ApiResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config)
            .map_err(|failure| ApiError::Unexpected(failure.cause))?;

        Ok(Self::with_transport(Arc::new(transport), credentials, notifier)
            .with_retry_policy(config.retry.clone()))
    }

    /// Client over a custom transport
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let bearer: Arc<dyn RequestInterceptor> =
            Arc::new(BearerAuthInjector::new(credentials.clone()));
        Self {
            transport,
            credentials,
            notifier,
            scheduler: Arc::new(TokioScheduler),
            interceptors: vec![bearer],
            retry_manager: RetryManager::default(),
        }
    }

    pub fn with_scheduler(mut self, scheduler: Arc<dyn RetryScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_manager = RetryManager::new(policy);
        self
    }

    /// Add an outbound interceptor; runs after credential injection
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub async fn get(&self, path: &str) -> ApiResult<HttpResponse> {
        self.execute(RequestDescriptor::get(path)).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<HttpResponse> {
        let request = self.with_json_body(RequestDescriptor::post(path), body)?;
        self.execute(request).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<HttpResponse> {
        let request = self.with_json_body(RequestDescriptor::put(path), body)?;
        self.execute(request).await
    }

    /// A body that cannot be serialized is a construction failure and is
    /// reported like any other.
    fn with_json_body<B: Serialize>(
        &self,
        request: RequestDescriptor,
        body: &B,
    ) -> ApiResult<RequestDescriptor> {
        request.with_json(body).map_err(|e| {
            self.reject(
                Err(TransportFailure::construction(format!(
                    "Body serialization failed: {}",
                    e
                ))),
                ErrorClassification::UnexpectedError,
            )
        })
    }

    pub async fn patch(&self, path: &str) -> ApiResult<HttpResponse> {
        self.execute(RequestDescriptor::patch(path)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<HttpResponse> {
        self.execute(RequestDescriptor::delete(path)).await
    }

    /// Run one logical call to completion.
    ///
    /// Resolves only with a 2xx response. Every rejection has already been
    /// reported to the notifier (at most once).
    pub async fn execute(&self, mut request: RequestDescriptor) -> ApiResult<HttpResponse> {
        loop {
            for interceptor in &self.interceptors {
                interceptor.intercept(&mut request);
            }

            debug!(
                http_method = %request.method,
                http_path = %request.path,
                "Sending request"
            );
            let outcome = self.transport.send(&request).await;
            log_outcome(&request, &outcome);

            match self
                .retry_manager
                .decide(&outcome, request.retry_state_mut())
            {
                RetryDecision::Resolve => {
                    return outcome.map_err(|failure| {
                        self.reject(Err(failure), ErrorClassification::UnexpectedError)
                    });
                }
                RetryDecision::RefreshCredentials => {
                    if self.refresh_credentials(&mut request).await {
                        continue;
                    }
                    return Err(self.end_session(outcome));
                }
                RetryDecision::Retry {
                    delay,
                    attempt_info,
                } => {
                    warn!(
                        http_method = %request.method,
                        http_path = %request.path,
                        retry_attempt = attempt_info.attempt_number,
                        delay_ms = %delay.as_millis(),
                        classification = ?attempt_info.error_classification,
                        "Scheduling retry"
                    );
                    if !self.scheduler.schedule(delay).wait().await {
                        return Err(ApiError::Unexpected(
                            "scheduled retry was cancelled".to_string(),
                        ));
                    }
                }
                RetryDecision::Reject { classification } => {
                    return Err(self.reject(outcome, classification));
                }
            }
        }
    }

    /// Returns `true` when a fresh token was obtained and the request should
    /// be resubmitted.
    async fn refresh_credentials(&self, request: &mut RequestDescriptor) -> bool {
        match self.credentials.refresh_token().await {
            Ok(true) => {
                if let Some(token) = self.credentials.access_token() {
                    set_bearer(request, &token);
                }
                info!(http_path = %request.path, "Credentials refreshed, resubmitting request");
                true
            }
            Ok(false) => {
                info!(http_path = %request.path, "Credential refresh declined");
                false
            }
            Err(err) => {
                warn!(http_path = %request.path, error = %err, "Credential refresh failed");
                false
            }
        }
    }

    fn end_session(&self, outcome: ResponseOutcome) -> ApiError {
        self.credentials.logout(false);
        self.notifier
            .notify(Notification::negative(SESSION_EXPIRED_MESSAGE));
        self.credentials.navigate(LOGIN_PATH);
        into_error(outcome, ErrorClassification::AuthExpired)
    }

    fn reject(&self, outcome: ResponseOutcome, classification: ErrorClassification) -> ApiError {
        if let Some(message) = failure_message(&outcome) {
            self.notifier.notify(Notification::negative(message));
        }
        let err = into_error(outcome, classification);
        error!(classification = ?classification, error = %err, "Request failed");
        err
    }
}

fn into_error(outcome: ResponseOutcome, classification: ErrorClassification) -> ApiError {
    match outcome {
        Ok(response) => match classification {
            ErrorClassification::AuthExpired => ApiError::AuthExpired(response),
            ErrorClassification::RateLimited => ApiError::RateLimited(response),
            ErrorClassification::ServerError => ApiError::ServerError(response),
            ErrorClassification::ClientError => ApiError::ClientError(response),
            ErrorClassification::NetworkError | ErrorClassification::UnexpectedError => {
                ApiError::UnexpectedStatus(response)
            }
        },
        Err(failure) => match failure.kind {
            FailureKind::NoResponse => ApiError::Network(failure.cause),
            FailureKind::RequestConstruction => ApiError::Unexpected(failure.cause),
        },
    }
}

fn log_outcome(request: &RequestDescriptor, outcome: &ResponseOutcome) {
    match outcome {
        Ok(response) => debug!(
            http_method = %request.method,
            http_path = %request.path,
            http_status = response.status,
            "Response received"
        ),
        Err(failure) => debug!(
            http_method = %request.method,
            http_path = %request.path,
            error = %failure,
            "No response"
        ),
    }
}
