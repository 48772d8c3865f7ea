//! JSON-over-HTTP transport shared by every remote service client.

mod agent;
#[cfg(test)]
pub(crate) mod mock;

pub use agent::UreqTransport;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct JsonRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl JsonRequest {
    pub fn post<U: Into<String>>(url: U, body: Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response; non-2xx statuses are returned here rather than as errors.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    pub status: u16,
    pub body: String,
}

impl JsonResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("transport task aborted: {0}")]
    Aborted(String),
    #[error("response body exceeds {0} bytes")]
    TooLarge(u64),
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(&self, request: JsonRequest) -> Result<JsonResponse, TransportError>;
}
