use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::aggregate::MetricsBlock;
use super::credentials::generate_credentials;
use crate::args::{
    DEFAULT_AUTH_HEADER, DEFAULT_DELAY_MS, DEFAULT_ERROR_THRESHOLD, DEFAULT_LOGIN_PATH,
    DEFAULT_REGISTER_PATH, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_FORMAT, HttpMethod,
};
use crate::http::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStep {
    Registration,
    Login,
    AuthenticatedTarget,
}

/// One request as issued by a session. Never modified after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestRecord {
    pub step: RequestStep,
    pub method: HttpMethod,
    pub url: String,
    pub latency_ms: Option<f64>,
    pub success: bool,
    pub status_code: i32,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMetrics {
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub requests: Vec<RequestRecord>,
}

impl UserMetrics {
    #[must_use]
    pub const fn new(user_id: String, email: String) -> Self {
        Self {
            user_id,
            email,
            token: None,
            requests: Vec::new(),
        }
    }
}

/// Credentials of an account that already exists on the target service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExistingUser {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSeed {
    New { numeric_id: u64 },
    Existing(ExistingUser),
}

/// Identity driven through one session chain.
#[derive(Debug, Clone)]
pub struct VirtualUser {
    pub numeric_id: Option<u64>,
    pub username: Option<String>,
    pub email: String,
    pub password: String,
    pub auth_token: Option<String>,
}

impl VirtualUser {
    /// New users get generated credentials; existing users keep theirs.
    #[must_use]
    pub fn from_seed(seed: UserSeed) -> Self {
        match seed {
            UserSeed::New { numeric_id } => {
                let generated = generate_credentials(numeric_id);
                Self {
                    numeric_id: Some(numeric_id),
                    username: Some(generated.username),
                    email: generated.email,
                    password: generated.password,
                    auth_token: None,
                }
            }
            UserSeed::Existing(user) => Self {
                numeric_id: None,
                username: None,
                email: user.email,
                password: user.password,
                auth_token: None,
            },
        }
    }

    #[must_use]
    pub const fn is_new_user(&self) -> bool {
        self.numeric_id.is_some()
    }

    /// Numeric id for generated users, email for existing ones.
    #[must_use]
    pub fn user_id(&self) -> String {
        self.numeric_id
            .map_or_else(|| self.email.clone(), |id| id.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct LoadTestConfig {
    pub base_url: String,
    pub registration_endpoint: String,
    pub login_endpoint: String,
    pub target_endpoint: String,
    pub http_method: HttpMethod,
    pub num_new_users: usize,
    pub existing_users: Vec<ExistingUser>,
    pub start_user_id: u64,
    /// Think-time between login and the target request.
    pub delay: Duration,
    pub auth_header_key: String,
    /// Auth header value with a `{token}` placeholder.
    pub auth_token_format: String,
    pub request_timeout: Duration,
    pub error_threshold: f64,
    pub target_payload: Option<Payload>,
    /// Sessions allowed in flight at once; `None` runs every user at once.
    pub max_concurrency: Option<NonZeroUsize>,
}

impl LoadTestConfig {
    #[must_use]
    pub fn new(base_url: &str, target_endpoint: &str, http_method: HttpMethod) -> Self {
        Self {
            base_url: base_url.to_owned(),
            registration_endpoint: DEFAULT_REGISTER_PATH.to_owned(),
            login_endpoint: DEFAULT_LOGIN_PATH.to_owned(),
            target_endpoint: target_endpoint.to_owned(),
            http_method,
            num_new_users: 0,
            existing_users: Vec::new(),
            start_user_id: 1,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            auth_header_key: DEFAULT_AUTH_HEADER.to_owned(),
            auth_token_format: DEFAULT_TOKEN_FORMAT.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            target_payload: None,
            max_concurrency: None,
        }
    }

    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadMode {
    #[serde(rename = "New Users (Registration + Login)")]
    NewUsers,
    #[serde(rename = "Existing Users (Login Only)")]
    ExistingUsers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestParameters {
    pub num_users: usize,
    pub http_method: HttpMethod,
    pub target_endpoint: String,
    #[serde(rename = "total_runtime_seconds", serialize_with = "serialize_seconds")]
    pub total_runtime: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadTestSummary {
    pub test_mode: LoadMode,
    pub test_parameters: TestParameters,
    pub metrics: MetricsBlock,
    pub user_results_detail: Vec<UserMetrics>,
}

fn serialize_seconds<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{:.2}", value.as_secs_f64()))
}
