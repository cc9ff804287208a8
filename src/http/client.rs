use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{ExecutionRequest, ExecutionResult, Payload, RequestExecutor, ResponseBody};
use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError};

/// [`RequestExecutor`] backed by a shared `reqwest` client.
///
/// Redirects are not followed so a 3xx answer is reported as-is.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Builds an executor with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> AppResult<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))?;
        Ok(Self { client })
    }

    async fn prepare(&self, request: &ExecutionRequest) -> Result<RequestBuilder, String> {
        let mut builder = self
            .client
            .request(request.method.to_reqwest(), request.url.as_str())
            .timeout(request.timeout);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let Some(payload) = request.payload.as_ref() else {
            return Ok(builder);
        };
        if !request.method.accepts_body() {
            warn!(
                method = request.method.as_str(),
                url = %request.url,
                "Payload provided for a method that does not send a body; ignoring it."
            );
            return Ok(builder);
        }

        let builder = match payload {
            Payload::Json(value @ (Value::Object(_) | Value::Array(_))) => builder.json(value),
            Payload::Json(Value::String(text)) => builder.body(text.clone()),
            Payload::Json(value) => builder.body(value.to_string()),
            Payload::Raw(text) => builder.body(text.clone()),
            Payload::Multipart { files, data } => {
                let mut form = Form::new();
                if let Some(Value::Object(fields)) = data {
                    for (name, value) in fields {
                        form = form.text(name.clone(), form_text(value));
                    }
                }
                for (field, path) in files {
                    form = form.part(field.clone(), file_part(path).await?);
                }
                builder.multipart(form)
            }
        };
        Ok(builder)
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self, request: ExecutionRequest) -> ExecutionResult {
        let builder = match self.prepare(&request).await {
            Ok(builder) => builder,
            Err(message) => return ExecutionResult::failed(None, message),
        };

        let start = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let latency_ms = round_latency_ms(start.elapsed());
                debug!(url = %request.url, "Request failed: {}", err);
                return ExecutionResult::failed(
                    Some(latency_ms),
                    describe_error(&err, request.timeout),
                );
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                let latency_ms = round_latency_ms(start.elapsed());
                debug!(
                    url = %request.url,
                    status = status.as_u16(),
                    "Reading response body failed: {}",
                    err
                );
                return ExecutionResult::failed(
                    Some(latency_ms),
                    describe_error(&err, request.timeout),
                );
            }
        };
        let latency_ms = round_latency_ms(start.elapsed());

        ExecutionResult {
            status_code: i32::from(status.as_u16()),
            latency_ms: Some(latency_ms),
            success: status.is_success() || status.is_redirection(),
            response: ResponseBody::from_text(body),
            error: None,
        }
    }
}

async fn file_part(path: &Path) -> Result<Part, String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| format!("file not found at path: {} ({})", path.display(), err))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Part::bytes(bytes).file_name(file_name))
}

fn form_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            value.to_string()
        }
    }
}

fn describe_error(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        format!(
            "Request timed out after {:.1} seconds.",
            timeout.as_secs_f64()
        )
    } else {
        format!("An error occurred: {}", err)
    }
}

/// Milliseconds rounded to two decimals.
pub(super) fn round_latency_ms(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100_000.0).round() / 100.0
}
