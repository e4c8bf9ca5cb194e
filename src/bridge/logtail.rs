//! Logtail ingestion client
//!
//! The client serializes records to JSON and POSTs them in a single request.
//! It never retries; callers such as
//! [`LogtailHandler`](crate::handlers::LogtailHandler) decide when to send.
//! The HTTP layer is injected through [`HttpTransport`], which also owns any
//! timeout policy.

use crate::core::{LoggerError, Result, TransportError};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_URI: &str = "https://in.logtail.com/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one HTTP request and reports the response, whatever its status
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

pub struct LogtailClient {
    token: String,
    uri: String,
    transport: Arc<dyn HttpTransport>,
}

impl LogtailClient {
    pub fn new(token: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            token: token.into(),
            uri: DEFAULT_URI.to_string(),
            transport,
        }
    }

    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = uri.into();
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Ship a single record
    pub fn log(&self, record: &Value) -> Result<()> {
        self.send(record)
    }

    /// Ship several records in one request
    pub fn log_batch(&self, records: &[Value]) -> Result<()> {
        self.send(records)
    }

    fn send<T: serde::Serialize + ?Sized>(&self, payload: &T) -> Result<()> {
        let request = HttpRequest {
            method: "POST".to_string(),
            url: self.uri.clone(),
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", self.token)),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: serde_json::to_string(payload)?,
        };

        let response = self.transport.send(request)?;
        if response.status >= 400 {
            return Err(LoggerError::remote(response.status, response.body));
        }

        Ok(())
    }
}

impl fmt::Debug for LogtailClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogtailClient")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

/// Blocking transport backed by `reqwest`
#[cfg(feature = "reqwest-transport")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "reqwest-transport")]
impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::with_source("cannot build HTTP client", e))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "reqwest-transport")]
impl HttpTransport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| TransportError::with_source("invalid HTTP method", e))?;

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .map_err(|e| TransportError::with_source("request failed", e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::with_source("cannot read response body", e))?;

        Ok(HttpResponse { status, body })
    }
}
