use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::Payload;
use crate::args::HttpMethod;

/// Status code reported when no HTTP response was received.
pub const NO_RESPONSE_STATUS: i32 = -1;

#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub payload: Option<Payload>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    /// Parses a body as JSON, falling back to raw text.
    #[must_use]
    pub fn from_text(text: String) -> Self {
        if text.is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }

    /// Looks up a top-level field of a JSON object body.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => value.get(name),
            ResponseBody::Text(_) | ResponseBody::Empty => None,
        }
    }
}

/// Outcome of one request. Transport failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub status_code: i32,
    pub latency_ms: Option<f64>,
    pub success: bool,
    #[serde(rename = "response_data")]
    pub response: ResponseBody,
    pub error: Option<String>,
}

impl ExecutionResult {
    #[must_use]
    pub fn failed(latency_ms: Option<f64>, error: String) -> Self {
        Self {
            status_code: NO_RESPONSE_STATUS,
            latency_ms,
            success: false,
            response: ResponseBody::Empty,
            error: Some(error),
        }
    }
}

/// Issues a single HTTP request and reports how it went.
///
/// Implementations must not fail: timeouts and connection errors are
/// reported with `success = false` and a status code of `-1`.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: ExecutionRequest) -> ExecutionResult;
}
