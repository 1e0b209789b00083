//! Outbound stage: request interceptors run before every transport attempt

use crate::auth::CredentialProvider;
use crate::http::request::RequestDescriptor;
use std::sync::Arc;

pub const AUTHORIZATION: &str = "Authorization";

/// Hook that may adjust a request before it is sent. Must not fail.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut RequestDescriptor);
}

/// Attaches `Authorization: Bearer <token>` while a session is active
pub struct BearerAuthInjector {
    credentials: Arc<dyn CredentialProvider>,
}

impl BearerAuthInjector {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { credentials }
    }
}

impl RequestInterceptor for BearerAuthInjector {
    fn intercept(&self, request: &mut RequestDescriptor) {
        if !self.credentials.is_authenticated() {
            return;
        }
        if let Some(token) = self.credentials.access_token().filter(|t| !t.is_empty()) {
            set_bearer(request, &token);
        }
    }
}

pub(crate) fn set_bearer(request: &mut RequestDescriptor, token: &str) {
    request.set_header(AUTHORIZATION, format!("Bearer {}", token));
}
