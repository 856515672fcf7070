//! The transport seam.
//!
//! `Transport` is the only I/O the core needs: issue one request, eventually
//! produce one `TransportResult`. `ReqwestTransport` is the default
//! implementation; tests and native hosts plug in their own.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportResult};

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Why no response was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    Other,
}

/// A failure before any HTTP response arrived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport failure ({kind:?}): {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Executes a single HTTP exchange.
///
/// Implementations must resolve every call exactly once, with either the
/// response (any status) or a `TransportError`.
pub trait Transport: Send + Sync {
    fn issue(&self, request: HttpRequest) -> impl Future<Output = TransportResult> + Send;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static("xsolla-sdk-rust/0.1"));

        let inner = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| ApiError::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { inner })
    }
}

impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = request.method.as_str(), url = %request.path))]
    async fn issue(&self, request: HttpRequest) -> TransportResult {
        let request_id = Uuid::new_v4().to_string();
        let mut builder = self
            .inner
            .request(reqwest_method(request.method), &request.path)
            .header(X_REQUEST_ID, &request_id);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(request_id = %request_id, error = %e, "no response received");
            transport_error(&e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.text().await.map_err(|e| transport_error(&e))?;

        debug!(request_id = %request_id, status, "response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn transport_error(e: &reqwest::Error) -> TransportError {
    let kind = if e.is_timeout() {
        TransportErrorKind::Timeout
    } else if e.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };
    TransportError::new(kind, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_map_one_to_one() {
        assert_eq!(reqwest_method(HttpMethod::Get), Method::GET);
        assert_eq!(reqwest_method(HttpMethod::Patch), Method::PATCH);
        assert_eq!(reqwest_method(HttpMethod::Delete), Method::DELETE);
    }

    #[test]
    fn transport_creation() {
        assert!(ReqwestTransport::new(Duration::from_secs(5)).is_ok());
    }
}
