//! Transport core: one HTTP attempt, no retries

use crate::config::ClientConfig;
use crate::http::request::RequestDescriptor;
use crate::http::response::{HttpResponse, ResponseOutcome, TransportFailure};
use crate::http::timeout_manager::TimeoutManager;
use crate::http::url_builder::UrlBuilder;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::str::FromStr;

const JSON_MIME: &str = "application/json";

/// Sends a single request and reports what came back
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> ResponseOutcome;
}

/// `reqwest`-backed transport bound to one base URL
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    timeout_manager: TimeoutManager,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportFailure> {
        let timeout_manager = TimeoutManager::from_millis(config.timeout_ms);
        let client = timeout_manager
            .apply_to_client_builder(Client::builder())
            .build()
            .map_err(|e| TransportFailure::construction(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout_manager,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, request: &RequestDescriptor) -> Result<reqwest::Request, TransportFailure> {
        let method = Method::from_str(&request.method.to_ascii_uppercase()).map_err(|_| {
            TransportFailure::construction(format!("Invalid HTTP method: {}", request.method))
        })?;

        let url = UrlBuilder::join(&self.base_url, &request.path)
            .map_err(TransportFailure::construction)?;

        let headers = merge_headers(&request.headers)?;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                TransportFailure::construction(format!("Body serialization failed: {}", e))
            })?;
            builder = builder.body(bytes);
        }

        builder
            .build()
            .map_err(|e| TransportFailure::construction(e.to_string()))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> ResponseOutcome {
        let http_request = self.build_request(request)?;

        let client = &self.client;
        let (status, headers, body_text) = self
            .timeout_manager
            .execute_with_timeout(async move {
                let response = client.execute(http_request).await?;
                let status = response.status().as_u16();
                let headers = response.headers().clone();
                let text = response.text().await?;
                Ok::<_, reqwest::Error>((status, headers, text))
            })
            .await?;

        Ok(HttpResponse {
            status,
            headers: collect_headers(&headers),
            body: parse_body(body_text),
        })
    }
}

/// Default JSON headers, overridden by anything the descriptor sets
fn merge_headers(custom: &HashMap<String, String>) -> Result<HeaderMap, TransportFailure> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_MIME));

    for (name, value) in custom {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TransportFailure::construction(format!("Invalid header name: {}", name)))?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            TransportFailure::construction(format!(
                "Invalid header value for {} (length: {})",
                name,
                value.len()
            ))
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut collected = HashMap::new();
    for (name, value) in headers {
        if let Ok(value_str) = value.to_str() {
            collected.insert(name.as_str().to_string(), value_str.to_string());
        }
    }
    collected
}

fn parse_body(body_text: String) -> JsonValue {
    if body_text.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_str(&body_text).unwrap_or(JsonValue::String(body_text))
    }
}
