use serde_json::{Value, json};
use tokio::time::sleep;
use tracing::debug;

use super::events::{EventSink, LoadEvent};
use super::types::{LoadTestConfig, RequestStep, UserMetrics, UserSeed, VirtualUser};
use crate::args::{HttpMethod, TOKEN_PLACEHOLDER};
use crate::http::{ExecutionRequest, ExecutionResult, Payload, RequestExecutor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    New,
    Registering,
    LoggingIn,
    Authenticated,
    TargetRequesting,
    Done,
    Failed,
}

/// Drives a single virtual user through its session chain.
///
/// Registration and login failures end the chain for that user only; the
/// target request is recorded whatever its outcome.
pub(super) struct SessionRunner<'run> {
    config: &'run LoadTestConfig,
    executor: &'run dyn RequestExecutor,
    events: &'run dyn EventSink,
}

impl<'run> SessionRunner<'run> {
    pub(super) const fn new(
        config: &'run LoadTestConfig,
        executor: &'run dyn RequestExecutor,
        events: &'run dyn EventSink,
    ) -> Self {
        Self {
            config,
            executor,
            events,
        }
    }

    pub(super) async fn run(&self, seed: UserSeed) -> UserMetrics {
        let mut user = VirtualUser::from_seed(seed);
        let mut metrics = UserMetrics::new(user.user_id(), user.email.clone());
        let mut state = SessionState::New;

        loop {
            debug!(user = %metrics.user_id, state = ?state, "Session step");
            state = match state {
                SessionState::New if user.is_new_user() => SessionState::Registering,
                SessionState::New => SessionState::LoggingIn,
                SessionState::Registering => self.register(&user, &mut metrics).await,
                SessionState::LoggingIn => self.login(&mut user, &mut metrics).await,
                SessionState::Authenticated => {
                    sleep(self.config.delay).await;
                    SessionState::TargetRequesting
                }
                SessionState::TargetRequesting => {
                    self.request_target(&user, &mut metrics).await;
                    SessionState::Done
                }
                SessionState::Done | SessionState::Failed => return metrics,
            };
        }
    }

    async fn register(&self, user: &VirtualUser, metrics: &mut UserMetrics) -> SessionState {
        let body = json!({
            "id": user.numeric_id,
            "username": user.username,
            "email": user.email,
            "password": user.password,
        });
        let result = self
            .request_and_record(
                metrics,
                RequestStep::Registration,
                HttpMethod::Post,
                &self.config.registration_endpoint,
                Vec::new(),
                Some(Payload::Json(body)),
            )
            .await;

        if result.success {
            SessionState::LoggingIn
        } else {
            SessionState::Failed
        }
    }

    async fn login(&self, user: &mut VirtualUser, metrics: &mut UserMetrics) -> SessionState {
        let credentials = json!({
            "email": user.email,
            "password": user.password,
        });
        let result = self
            .request_and_record(
                metrics,
                RequestStep::Login,
                HttpMethod::Post,
                &self.config.login_endpoint,
                Vec::new(),
                Some(Payload::Json(credentials)),
            )
            .await;

        match extract_token(&result) {
            Some(token) if result.success => {
                metrics.token = Some(token.clone());
                user.auth_token = Some(token);
                SessionState::Authenticated
            }
            Some(_) | None => {
                let error_detail = result.error.unwrap_or_else(|| {
                    if result.success {
                        "Login response did not include a token".to_owned()
                    } else {
                        "No response data".to_owned()
                    }
                });
                self.events.emit(LoadEvent::LoginFailed {
                    user: metrics.user_id.clone(),
                    status_code: result.status_code,
                    error_detail,
                });
                SessionState::Failed
            }
        }
    }

    async fn request_target(&self, user: &VirtualUser, metrics: &mut UserMetrics) {
        let token = user.auth_token.as_deref().unwrap_or_default();
        let header_value = self
            .config
            .auth_token_format
            .replace(TOKEN_PLACEHOLDER, token);
        let headers = vec![(self.config.auth_header_key.clone(), header_value)];
        self.request_and_record(
            metrics,
            RequestStep::AuthenticatedTarget,
            self.config.http_method,
            &self.config.target_endpoint,
            headers,
            self.config.target_payload.clone(),
        )
        .await;
    }

    async fn request_and_record(
        &self,
        metrics: &mut UserMetrics,
        step: RequestStep,
        method: HttpMethod,
        endpoint: &str,
        headers: Vec<(String, String)>,
        payload: Option<Payload>,
    ) -> ExecutionResult {
        let url = self.config.endpoint_url(endpoint);
        let payload_echo = payload.as_ref().map_or(Value::Null, Payload::echo);
        let result = self
            .executor
            .execute(ExecutionRequest {
                url: url.clone(),
                method,
                headers,
                payload,
                timeout: self.config.request_timeout,
            })
            .await;
        metrics.record(step, method, url, result, payload_echo)
    }
}

/// Token from a login response body; non-string values are stringified.
fn extract_token(result: &ExecutionResult) -> Option<String> {
    match result.response.field("token")? {
        Value::Null => None,
        Value::String(token) => Some(token.clone()),
        value @ (Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_)) => {
            Some(value.to_string())
        }
    }
}
