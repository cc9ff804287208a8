use serde_json::Value;

use super::types::{RequestRecord, RequestStep, UserMetrics};
use crate::args::HttpMethod;
use crate::http::ExecutionResult;

impl UserMetrics {
    /// Appends the outcome of one session step and hands the executor result
    /// back so the session can branch on it.
    pub fn record(
        &mut self,
        step: RequestStep,
        method: HttpMethod,
        url: String,
        result: ExecutionResult,
        payload_echo: Value,
    ) -> ExecutionResult {
        self.requests.push(RequestRecord {
            step,
            method,
            url,
            latency_ms: result.latency_ms,
            success: result.success,
            status_code: result.status_code,
            payload: payload_echo,
        });
        result
    }
}
