//! Credential access for the request pipeline
//!
//! The pipeline never owns credential state. It reads the bearer token through
//! [`CredentialProvider`] and asks the provider to refresh, log out or send the
//! user to the login view when a session cannot be recovered.

use async_trait::async_trait;
use std::sync::RwLock;

/// Path the application is sent to once a session cannot be refreshed.
pub const LOGIN_PATH: &str = "/login";

/// Abstract interface over the application's credential store
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Whether a user session is currently established
    fn is_authenticated(&self) -> bool;

    /// Current bearer token, if any
    fn access_token(&self) -> Option<String>;

    /// Exchange the refresh credential for a new access token.
    ///
    /// `Ok(true)` means a new token is now available through
    /// [`access_token`](Self::access_token). `Ok(false)` and `Err(_)` are both
    /// treated as an unrecoverable session.
    async fn refresh_token(&self) -> anyhow::Result<bool>;

    /// Drop the session. `forced` asks the store to perform its own redirect.
    fn logout(&self, forced: bool);

    /// Route the application to `path`
    fn navigate(&self, path: &str);
}

/// Credentials handed in from the outside (CLI flag, environment).
///
/// There is no refresh credential, so refreshing always reports failure and
/// the first expired-token response ends the session.
#[derive(Debug, Default)]
pub struct StaticCredentials {
    token: RwLock<Option<String>>,
}

impl StaticCredentials {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.is_empty())),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    fn is_authenticated(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    fn access_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    async fn refresh_token(&self) -> anyhow::Result<bool> {
        tracing::debug!("static credentials cannot be refreshed");
        Ok(false)
    }

    fn logout(&self, forced: bool) {
        if let Ok(mut token) = self.token.write() {
            *token = None;
        }
        tracing::info!(forced = %forced, "Session cleared");
    }

    fn navigate(&self, path: &str) {
        tracing::info!(path = %path, "Navigation requested");
    }
}
