//! Test doubles for the pipeline collaborators

use crate::auth::CredentialProvider;
use crate::http::request::RequestDescriptor;
use crate::http::response::{HttpResponse, ResponseOutcome, TransportFailure};
use crate::http::scheduler::{RetryScheduler, ScheduledRetry};
use crate::http::transport::Transport;
use crate::notify::{Notification, Notifier};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

type Responder = Box<dyn Fn(&RequestDescriptor) -> ResponseOutcome + Send + Sync>;

/// Transport that answers from a script and records every attempt
pub struct ScriptedTransport {
    responder: Responder,
    sent: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedTransport {
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&RequestDescriptor) -> ResponseOutcome + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Answer attempts in order
    pub fn sequence(outcomes: Vec<ResponseOutcome>) -> Self {
        let queue = Mutex::new(VecDeque::from(outcomes));
        Self::from_fn(move |_| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportFailure::construction("script exhausted")))
        })
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<RequestDescriptor> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RequestDescriptor) -> ResponseOutcome {
        self.sent.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

pub fn status(code: u16) -> ResponseOutcome {
    Ok(HttpResponse::new(code, JsonValue::Null))
}

pub fn status_with_body(code: u16, body: JsonValue) -> ResponseOutcome {
    Ok(HttpResponse::new(code, body))
}

#[derive(Debug, Clone)]
pub enum RefreshScript {
    /// Refresh succeeds and installs this token
    Succeed(String),
    /// Refresh resolves `false`
    Decline,
    /// Refresh raises
    Fail,
}

/// Credential store double with call counters
pub struct MockCredentials {
    authenticated: AtomicBool,
    token: Mutex<Option<String>>,
    refresh: RefreshScript,
    barrier: Option<Arc<Barrier>>,
    pub refresh_calls: AtomicUsize,
    pub logouts: Mutex<Vec<bool>>,
    pub navigations: Mutex<Vec<String>>,
}

impl MockCredentials {
    pub fn new(token: &str, refresh: RefreshScript) -> Self {
        Self {
            authenticated: AtomicBool::new(true),
            token: Mutex::new(Some(token.to_string())),
            refresh,
            barrier: None,
            refresh_calls: AtomicUsize::new(0),
            logouts: Mutex::new(Vec::new()),
            navigations: Mutex::new(Vec::new()),
        }
    }

    pub fn anonymous() -> Self {
        let creds = Self::new("", RefreshScript::Decline);
        creds.authenticated.store(false, Ordering::SeqCst);
        *creds.token.lock().unwrap() = None;
        creds
    }

    /// Hold every refresh call until `barrier` is complete
    pub fn with_refresh_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for MockCredentials {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn access_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    async fn refresh_token(&self) -> anyhow::Result<bool> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        match &self.refresh {
            RefreshScript::Succeed(token) => {
                *self.token.lock().unwrap() = Some(token.clone());
                Ok(true)
            }
            RefreshScript::Decline => Ok(false),
            RefreshScript::Fail => anyhow::bail!("refresh endpoint rejected the refresh token"),
        }
    }

    fn logout(&self, forced: bool) {
        self.authenticated.store(false, Ordering::SeqCst);
        *self.token.lock().unwrap() = None;
        self.logouts.lock().unwrap().push(forced);
    }

    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// Scheduler that records requested delays and fires immediately
#[derive(Default)]
pub struct RecordingScheduler {
    delays: Mutex<Vec<Duration>>,
    cancel_all: bool,
}

impl RecordingScheduler {
    pub fn cancelling() -> Self {
        Self {
            delays: Mutex::new(Vec::new()),
            cancel_all: true,
        }
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl RetryScheduler for RecordingScheduler {
    fn schedule(&self, delay: Duration) -> ScheduledRetry {
        self.delays.lock().unwrap().push(delay);
        if self.cancel_all {
            let retry = ScheduledRetry::new(delay, Box::pin(futures::future::pending::<()>()));
            retry.cancel_handle().cancel();
            retry
        } else {
            ScheduledRetry::new(delay, Box::pin(async {}))
        }
    }
}
