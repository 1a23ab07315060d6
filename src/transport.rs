//! Pluggable HTTP transport.
//!
//! The engine never talks to reqwest directly. It issues [`ApiRequest`]s
//! through the [`Transport`] trait so tests can substitute a scripted
//! transport; [`HttpTransport`] is the production implementation.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

/// Default total request timeout when the engine does not supply one.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug, Clone)]
pub enum TransportError {
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound API request, fully assembled by the request builder.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Per-request timeout; `None` uses the transport default.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Submit responses are accepted on 200 and 201 only.
    pub fn is_ok(&self) -> bool {
        self.status == 200 || self.status == 201
    }

    /// Canonical reason phrase for the status code.
    pub fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown error")
    }
}

/// Performs HTTP requests on behalf of the engine.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

/// Production transport built on a shared reqwest client.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let timeout_ms = request
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .as_millis() as u64;

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        debug!("[transport] {:?} {}", request.method, request.url);

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(timeout_ms)
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ok_accepts_200_and_201() {
        let ok = ApiResponse { status: 200, body: String::new() };
        assert!(ok.is_ok());
        let created = ApiResponse { status: 201, body: String::new() };
        assert!(created.is_ok());
        let server_error = ApiResponse { status: 500, body: String::new() };
        assert!(!server_error.is_ok());
    }

    #[test]
    fn test_reason_phrase() {
        let response = ApiResponse { status: 503, body: String::new() };
        assert_eq!(response.reason(), "Service Unavailable");
        let unknown = ApiResponse { status: 599, body: String::new() };
        assert_eq!(unknown.reason(), "Unknown error");
    }

    #[test]
    fn test_timeout_error_mentions_timed_out() {
        // The engine classifies timeouts by this substring.
        let err = TransportError::Timeout(100);
        assert!(err.to_string().contains("timed out"));
    }
}
