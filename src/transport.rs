//! HTTP transport for the remote service.
//!
//! Handles HTTP communication and maps failed responses into typed
//! [`ServiceError`]s. Retries are left to the caller.

use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ServiceError};

/// Media type requested from the GitHub REST API.
const GITHUB_JSON: &str = "application/vnd.github+json";

/// User agent sent with every request (GitHub rejects requests without one).
const DEFAULT_USER_AGENT: &str = concat!("contributors/", env!("CARGO_PKG_VERSION"));

/// Thin HTTP layer that issues GET requests and decodes JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL for API requests (e.g., "<https://api.github.com>")
    /// * `timeout` - Request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON list.
    ///
    /// `204 No Content` decodes as an empty list.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] on transport, status or decode failures.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, GITHUB_JSON)
            .query(params)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(parse_error_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(format!("Failed to parse response: {e}")))
    }
}

/// Parse an error response into a typed error.
async fn parse_error_response(response: Response) -> ServiceError {
    let status = response.status();
    let request_id = request_id(response.headers());
    let quota_exhausted = quota_exhausted(response.headers());

    let data: Value = response.json().await.unwrap_or_else(|_| serde_json::json!({}));
    let message = data
        .get("message")
        .and_then(Value::as_str)
        .map_or_else(|| format!("HTTP {}", status.as_u16()), String::from);

    classify(status, message, request_id, quota_exhausted)
}

fn classify(
    status: StatusCode,
    message: String,
    request_id: Option<String>,
    quota_exhausted: bool,
) -> ServiceError {
    let code = status.as_u16();
    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound {
            status: code,
            message,
            request_id,
        },
        StatusCode::TOO_MANY_REQUESTS => ServiceError::RateLimited {
            status: code,
            message,
            request_id,
        },
        StatusCode::FORBIDDEN if quota_exhausted => ServiceError::RateLimited {
            status: code,
            message,
            request_id,
        },
        s if s.is_server_error() => ServiceError::Server {
            status: code,
            message,
            request_id,
        },
        _ => ServiceError::Status {
            status: code,
            message,
            request_id,
        },
    }
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-GitHub-Request-Id")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn quota_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get("X-RateLimit-Remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        == Some(0)
}
