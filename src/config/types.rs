use serde::Deserialize;
use serde_json::Value;

use crate::args::{HttpMethod, OutputFormat};
use crate::load::ExistingUser;

/// Load-test settings read from `netpulse.toml` / `netpulse.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub users: Option<usize>,
    pub delay: Option<DurationValue>,
    pub target: Option<String>,
    pub timeout: Option<DurationValue>,
    pub payload: Option<Value>,
    #[serde(alias = "start")]
    pub start_user_id: Option<u64>,
    pub login_path: Option<String>,
    pub register_path: Option<String>,
    pub auth_header: Option<String>,
    pub token_format: Option<String>,
    pub error_threshold: Option<f64>,
    pub max_concurrency: Option<usize>,
    pub output: Option<String>,
    pub output_format: Option<OutputFormat>,
    #[serde(default)]
    pub existing_users: Vec<ExistingUser>,
}

/// A duration written either as a bare number or with a unit suffix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Number(u64),
    Text(String),
}

impl DurationValue {
    #[must_use]
    pub fn as_arg(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}
