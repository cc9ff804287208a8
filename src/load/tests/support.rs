use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::http::{ExecutionRequest, ExecutionResult, Payload, RequestExecutor, ResponseBody};

type Rule = Box<dyn Fn(&ExecutionRequest) -> Option<ExecutionResult> + Send + Sync>;
type DelayRule = Box<dyn Fn(&ExecutionRequest) -> Duration + Send + Sync>;

/// Fake service: every request succeeds with a fixed latency, logins return
/// a token derived from the email, and rules can override single requests.
pub(super) struct ScriptedExecutor {
    latency_ms: f64,
    rules: Vec<Rule>,
    delay: Option<DelayRule>,
    calls: Mutex<Vec<ExecutionRequest>>,
}

impl ScriptedExecutor {
    pub(super) fn new(latency_ms: f64) -> Self {
        Self {
            latency_ms,
            rules: Vec::new(),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn with_rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&ExecutionRequest) -> Option<ExecutionResult> + Send + Sync + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    /// Simulated network time per request, applied with `tokio::time::sleep`.
    pub(super) fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(&ExecutionRequest) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Box::new(delay));
        self
    }

    pub(super) fn calls(&self) -> Vec<ExecutionRequest> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(super) fn ok(&self, body: Value) -> ExecutionResult {
        ExecutionResult {
            status_code: 200,
            latency_ms: Some(self.latency_ms),
            success: true,
            response: ResponseBody::Json(body),
            error: None,
        }
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(&self, request: ExecutionRequest) -> ExecutionResult {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }
        if let Some(delay) = self.delay.as_ref() {
            tokio::time::sleep(delay(&request)).await;
        }
        if let Some(result) = self.rules.iter().find_map(|rule| rule(&request)) {
            return result;
        }
        if request.url.ends_with("/login") {
            let email = request_email(&request).unwrap_or_default();
            return self.ok(json!({ "token": format!("tok-{}", email) }));
        }
        self.ok(json!({ "ok": true }))
    }
}

pub(super) fn request_email(request: &ExecutionRequest) -> Option<String> {
    request
        .payload
        .as_ref()
        .map(Payload::echo)
        .and_then(|echo| echo.get("email").and_then(Value::as_str).map(str::to_owned))
}

pub(super) fn status_result(status_code: i32, latency_ms: f64) -> ExecutionResult {
    ExecutionResult {
        status_code,
        latency_ms: Some(latency_ms),
        success: (200..400).contains(&status_code),
        response: ResponseBody::Empty,
        error: None,
    }
}

pub(super) fn timeout_result() -> ExecutionResult {
    ExecutionResult::failed(
        Some(5000.0),
        "Request timed out after 5.0 seconds.".to_owned(),
    )
}
