use crate::config::ConfigError;
use crate::http::response::HttpResponse;
use crate::http::retry_manager::ErrorClassification;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication expired (HTTP {})", .0.status)]
    AuthExpired(HttpResponse),

    #[error("Rate limited (HTTP {})", .0.status)]
    RateLimited(HttpResponse),

    #[error("Server error (HTTP {})", .0.status)]
    ServerError(HttpResponse),

    #[error("Client error (HTTP {})", .0.status)]
    ClientError(HttpResponse),

    #[error("Unexpected response status (HTTP {})", .0.status)]
    UnexpectedStatus(HttpResponse),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// The final response behind this error, when the server answered at all.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::AuthExpired(response)
            | ApiError::RateLimited(response)
            | ApiError::ServerError(response)
            | ApiError::ClientError(response)
            | ApiError::UnexpectedStatus(response) => Some(response),
            _ => None,
        }
    }

    /// HTTP status of the final response, if any.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    pub fn classification(&self) -> ErrorClassification {
        match self {
            ApiError::AuthExpired(_) => ErrorClassification::AuthExpired,
            ApiError::RateLimited(_) => ErrorClassification::RateLimited,
            ApiError::ServerError(_) => ErrorClassification::ServerError,
            ApiError::ClientError(_) => ErrorClassification::ClientError,
            ApiError::Network(_) => ErrorClassification::NetworkError,
            ApiError::UnexpectedStatus(_)
            | ApiError::Unexpected(_)
            | ApiError::Rejected(_)
            | ApiError::Serialization(_)
            | ApiError::Config(_) => ErrorClassification::UnexpectedError,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
