//! Inbound classification and retry decisions
//!
//! [`RetryManager::decide`] is the pure half of the inbound stage: it looks at
//! one transport outcome and the descriptor's [`RetryState`], advances the
//! counters, and says what the pipeline should do next. The side effects
//! (refreshing, sleeping, notifying) live in the pipeline.
//!
//! ```text
//! 2xx                                  -> Resolve
//! 401, refresh unused                  -> RefreshCredentials (flag set)
//! 429 + Retry-After, no retry recorded -> Retry(Retry-After seconds)
//! >=500, count < max                   -> Retry(base * 2^count)
//! anything else                        -> Reject
//! ```

use crate::config::RetryPolicy;
use crate::http::request::RetryState;
use crate::http::response::{FailureKind, HttpResponse, ResponseOutcome};
use std::time::Duration;

/// Classification of failures for retry decision making
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    /// 401: recoverable through a credential refresh
    AuthExpired,
    /// 429: recoverable once when the server says when to come back
    RateLimited,
    /// 5xx: recoverable with bounded exponential backoff
    ServerError,
    /// 403/404/other 4xx: never retried
    ClientError,
    /// No response received
    NetworkError,
    /// Request construction failures and unclassified statuses
    UnexpectedError,
}

/// Retry attempt information
#[derive(Debug, Clone, PartialEq)]
pub struct RetryAttempt {
    /// Value of the server retry counter after this decision
    pub attempt_number: u32,
    pub delay_before_attempt: Duration,
    pub error_classification: ErrorClassification,
}

/// What the pipeline should do with an outcome
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    /// Hand the response to the caller
    Resolve,
    /// Use the single credential refresh, then resubmit
    RefreshCredentials,
    /// Resubmit the same descriptor after `delay`
    Retry {
        delay: Duration,
        attempt_info: RetryAttempt,
    },
    /// Terminal: report once and reject
    Reject {
        classification: ErrorClassification,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RetryManager {
    policy: RetryPolicy,
}

impl RetryManager {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Classify a status code; `None` for 2xx
    pub fn classify_status_code(status_code: u16) -> Option<ErrorClassification> {
        match status_code {
            200..=299 => None,
            401 => Some(ErrorClassification::AuthExpired),
            429 => Some(ErrorClassification::RateLimited),
            500..=u16::MAX => Some(ErrorClassification::ServerError),
            400..=499 => Some(ErrorClassification::ClientError),
            _ => Some(ErrorClassification::UnexpectedError),
        }
    }

    /// Classify a transport outcome; `None` for success
    pub fn classify(outcome: &ResponseOutcome) -> Option<ErrorClassification> {
        match outcome {
            Ok(response) => Self::classify_status_code(response.status),
            Err(failure) => Some(match failure.kind {
                FailureKind::NoResponse => ErrorClassification::NetworkError,
                FailureKind::RequestConstruction => ErrorClassification::UnexpectedError,
            }),
        }
    }

    /// Decide the next step for `outcome`, advancing `state`
    pub fn decide(&self, outcome: &ResponseOutcome, state: &mut RetryState) -> RetryDecision {
        let response = match outcome {
            Ok(response) => response,
            Err(_) => {
                return RetryDecision::Reject {
                    classification: Self::classify(outcome)
                        .unwrap_or(ErrorClassification::UnexpectedError),
                }
            }
        };

        let classification = match Self::classify_status_code(response.status) {
            None => return RetryDecision::Resolve,
            Some(classification) => classification,
        };

        if response.status == 401 && !state.auth_retry_attempted {
            state.auth_retry_attempted = true;
            return RetryDecision::RefreshCredentials;
        }

        if response.status == 429 {
            if let Some(delay) = self.rate_limit_delay(response, state) {
                state.server_retry_count = 1;
                return RetryDecision::Retry {
                    delay,
                    attempt_info: RetryAttempt {
                        attempt_number: state.server_retry_count,
                        delay_before_attempt: delay,
                        error_classification: classification,
                    },
                };
            }
        }

        if response.status >= 500 && state.server_retry_count < self.policy.max_server_retries {
            state.server_retry_count += 1;
            let delay = self.server_error_delay(state.server_retry_count);
            return RetryDecision::Retry {
                delay,
                attempt_info: RetryAttempt {
                    attempt_number: state.server_retry_count,
                    delay_before_attempt: delay,
                    error_classification: classification,
                },
            };
        }

        RetryDecision::Reject { classification }
    }

    /// Delay before server retry number `retry_count` (1-based): base * 2^n
    pub fn server_error_delay(&self, retry_count: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry_count);
        Duration::from_millis(self.policy.backoff_base_ms.saturating_mul(factor))
    }

    /// A 429 is retried once, only when the server sent `Retry-After` and no
    /// retry has been spent on this descriptor yet.
    fn rate_limit_delay(&self, response: &HttpResponse, state: &RetryState) -> Option<Duration> {
        if state.server_retry_count != 0 || self.policy.max_server_retries == 0 {
            return None;
        }
        let header = response.header("retry-after")?;
        if header.is_empty() {
            return None;
        }
        Some(parse_retry_after(header))
    }
}

/// Parse `Retry-After` as integer seconds.
///
/// Only the leading digits count; a value without any (an HTTP date, say)
/// gives an immediate retry.
pub fn parse_retry_after(value: &str) -> Duration {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let seconds = digits.parse::<u64>().unwrap_or(0);
    Duration::from_millis(seconds.saturating_mul(1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::TransportFailure;
    use serde_json::Value as JsonValue;

    fn status(code: u16) -> ResponseOutcome {
        Ok(HttpResponse::new(code, JsonValue::Null))
    }

    fn rate_limited(retry_after: &str) -> ResponseOutcome {
        Ok(HttpResponse::new(429, JsonValue::Null).with_header("Retry-After", retry_after))
    }

    fn delay_of(decision: RetryDecision) -> Duration {
        match decision {
            RetryDecision::Retry { delay, .. } => delay,
            other => panic!("expected retry, got {:?}", other),
        }
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(RetryManager::classify_status_code(200), None);
        assert_eq!(RetryManager::classify_status_code(204), None);
        assert_eq!(
            RetryManager::classify_status_code(401),
            Some(ErrorClassification::AuthExpired)
        );
        assert_eq!(
            RetryManager::classify_status_code(403),
            Some(ErrorClassification::ClientError)
        );
        assert_eq!(
            RetryManager::classify_status_code(404),
            Some(ErrorClassification::ClientError)
        );
        assert_eq!(
            RetryManager::classify_status_code(429),
            Some(ErrorClassification::RateLimited)
        );
        assert_eq!(
            RetryManager::classify_status_code(501),
            Some(ErrorClassification::ServerError)
        );
        assert_eq!(
            RetryManager::classify_status_code(302),
            Some(ErrorClassification::UnexpectedError)
        );
    }

    #[test]
    fn test_success_resolves() {
        let manager = RetryManager::default();
        let mut state = RetryState::default();
        assert_eq!(manager.decide(&status(200), &mut state), RetryDecision::Resolve);
        assert_eq!(state, RetryState::default());
    }

    #[test]
    fn test_auth_refresh_is_one_shot() {
        let manager = RetryManager::default();
        let mut state = RetryState::default();

        assert_eq!(
            manager.decide(&status(401), &mut state),
            RetryDecision::RefreshCredentials
        );
        assert!(state.auth_retry_attempted);

        assert_eq!(
            manager.decide(&status(401), &mut state),
            RetryDecision::Reject {
                classification: ErrorClassification::AuthExpired
            }
        );
        assert!(state.auth_retry_attempted);
    }

    #[test]
    fn test_server_error_backoff_sequence() {
        let manager = RetryManager::default();
        let mut state = RetryState::default();

        assert_eq!(
            delay_of(manager.decide(&status(500), &mut state)),
            Duration::from_millis(2000)
        );
        assert_eq!(state.server_retry_count, 1);

        assert_eq!(
            delay_of(manager.decide(&status(503), &mut state)),
            Duration::from_millis(4000)
        );
        assert_eq!(state.server_retry_count, 2);

        assert_eq!(
            manager.decide(&status(502), &mut state),
            RetryDecision::Reject {
                classification: ErrorClassification::ServerError
            }
        );
        assert_eq!(state.server_retry_count, 2);
    }

    #[test]
    fn test_rate_limit_with_retry_after() {
        let manager = RetryManager::default();
        let mut state = RetryState::default();

        assert_eq!(
            delay_of(manager.decide(&rate_limited("3"), &mut state)),
            Duration::from_millis(3000)
        );
        assert_eq!(state.server_retry_count, 1);

        // second 429 on the same descriptor reports immediately
        assert_eq!(
            manager.decide(&rate_limited("3"), &mut state),
            RetryDecision::Reject {
                classification: ErrorClassification::RateLimited
            }
        );
    }

    #[test]
    fn test_rate_limit_without_header_rejects() {
        let manager = RetryManager::default();
        let mut state = RetryState::default();
        assert_eq!(
            manager.decide(&status(429), &mut state),
            RetryDecision::Reject {
                classification: ErrorClassification::RateLimited
            }
        );
        assert_eq!(state.server_retry_count, 0);
    }

    #[test]
    fn test_rate_limit_after_server_retry_rejects() {
        let manager = RetryManager::default();
        let mut state = RetryState {
            auth_retry_attempted: false,
            server_retry_count: 1,
        };
        assert!(matches!(
            manager.decide(&rate_limited("1"), &mut state),
            RetryDecision::Reject { .. }
        ));
    }

    #[test]
    fn test_rate_limit_retry_shares_server_budget() {
        let manager = RetryManager::default();
        let mut state = RetryState::default();

        delay_of(manager.decide(&rate_limited("1"), &mut state));
        // one more server retry remains, at the second backoff step
        assert_eq!(
            delay_of(manager.decide(&status(500), &mut state)),
            Duration::from_millis(4000)
        );
        assert!(matches!(
            manager.decide(&status(500), &mut state),
            RetryDecision::Reject { .. }
        ));
    }

    #[test]
    fn test_transport_failures_are_terminal() {
        let manager = RetryManager::default();
        let mut state = RetryState::default();

        assert_eq!(
            manager.decide(&Err(TransportFailure::no_response("refused")), &mut state),
            RetryDecision::Reject {
                classification: ErrorClassification::NetworkError
            }
        );
        assert_eq!(
            manager.decide(&Err(TransportFailure::construction("bad url")), &mut state),
            RetryDecision::Reject {
                classification: ErrorClassification::UnexpectedError
            }
        );
        assert_eq!(state, RetryState::default());
    }

    #[test]
    fn test_client_errors_never_retry() {
        let manager = RetryManager::default();
        for code in [400, 403, 404, 409, 422] {
            let mut state = RetryState::default();
            assert_eq!(
                manager.decide(&status(code), &mut state),
                RetryDecision::Reject {
                    classification: ErrorClassification::ClientError
                }
            );
        }
    }

    #[test]
    fn test_custom_policy() {
        let manager = RetryManager::new(RetryPolicy {
            max_server_retries: 3,
            backoff_base_ms: 100,
        });
        let mut state = RetryState::default();
        let delays: Vec<_> = (0..3)
            .map(|_| delay_of(manager.decide(&status(500), &mut state)))
            .collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800)
            ]
        );
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("3"), Duration::from_millis(3000));
        assert_eq!(parse_retry_after(" 12 "), Duration::from_millis(12000));
        assert_eq!(parse_retry_after("5.5"), Duration::from_millis(5000));
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"),
            Duration::ZERO
        );
    }
}
