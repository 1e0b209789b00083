//! Deferred resubmission
//!
//! Retries are scheduled through [`RetryScheduler`] so the pipeline never
//! sleeps on the wall clock directly.

use futures::future::BoxFuture;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A pending retry delay.
///
/// Completes after the delay elapses, or early when the token is cancelled.
pub struct ScheduledRetry {
    delay: Duration,
    token: CancellationToken,
    timer: BoxFuture<'static, ()>,
}

impl ScheduledRetry {
    pub fn new(delay: Duration, timer: BoxFuture<'static, ()>) -> Self {
        Self {
            delay,
            token: CancellationToken::new(),
            timer,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Handle that aborts this retry when cancelled
    pub fn cancel_handle(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for the delay. Returns `false` if the retry was cancelled.
    pub async fn wait(self) -> bool {
        let Self { token, timer, .. } = self;
        tokio::select! {
            _ = token.cancelled() => false,
            _ = timer => true,
        }
    }
}

/// Creates retry timers
pub trait RetryScheduler: Send + Sync {
    fn schedule(&self, delay: Duration) -> ScheduledRetry;
}

/// Timers backed by `tokio::time`
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler;

impl RetryScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration) -> ScheduledRetry {
        ScheduledRetry::new(delay, Box::pin(tokio::time::sleep(delay)))
    }
}
