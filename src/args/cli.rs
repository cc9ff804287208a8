use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::time::Duration;

use super::defaults::{
    DEFAULT_AUTH_HEADER, DEFAULT_LOGIN_PATH, DEFAULT_REGISTER_PATH, DEFAULT_START_USER_ID,
    DEFAULT_TARGET_PATH, DEFAULT_TOKEN_FORMAT, DEFAULT_USERS,
};
use super::parsers::{
    parse_delay_arg, parse_header, parse_json_arg, parse_ratio, parse_timeout_arg,
    parse_token_format,
};
use super::types::{HttpMethod, OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Network and API diagnostics toolkit - single HTTP probes and multi-step virtual-user load tests."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (overridden by NETPULSE_LOG / RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a load test with simulated users (register, login, authenticated request)
    Load(LoadArgs),
    /// Send a single HTTP request and print the measured result
    Http(HttpArgs),
}

#[derive(Debug, Args, Clone)]
pub struct LoadArgs {
    /// Base URL of the service under test
    #[arg(long, short)]
    pub url: Option<String>,

    /// HTTP method for the authenticated target request
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Number of new users to register and log in (defaults to 10 without existing users)
    #[arg(long = "users", short = 'n')]
    pub users: Option<PositiveUsize>,

    /// Think-time between login and the target request (bare numbers are ms)
    #[arg(long, default_value = "50", value_parser = parse_delay_arg)]
    pub delay: Duration,

    /// Target endpoint path, appended to the base URL
    #[arg(long, default_value = DEFAULT_TARGET_PATH)]
    pub target: String,

    /// Per-request timeout (supports ms/s/m/h, bare numbers are seconds)
    #[arg(long, default_value = "5s", value_parser = parse_timeout_arg)]
    pub timeout: Duration,

    /// JSON payload for the target request; {"files": {...}, "data": {...}} uploads files
    #[arg(long, value_parser = parse_json_arg)]
    pub payload: Option<Value>,

    /// First numeric id used to derive new user identities
    #[arg(long = "start", default_value_t = DEFAULT_START_USER_ID)]
    pub start_user_id: u64,

    /// Login endpoint path
    #[arg(long = "login-path", default_value = DEFAULT_LOGIN_PATH)]
    pub login_path: String,

    /// Registration endpoint path
    #[arg(long = "register-path", default_value = DEFAULT_REGISTER_PATH)]
    pub register_path: String,

    /// Header carrying the auth token on the target request
    #[arg(long = "auth-header", default_value = DEFAULT_AUTH_HEADER)]
    pub auth_header: String,

    /// Auth header value template; {token} is replaced by the login token
    #[arg(long = "token-format", default_value = DEFAULT_TOKEN_FORMAT, value_parser = parse_token_format)]
    pub token_format: String,

    /// Error-rate ceiling (0-1) above which a warning is logged
    #[arg(long = "error-threshold", default_value = "0.05", value_parser = parse_ratio)]
    pub error_threshold: f64,

    /// Maximum number of user sessions in flight (defaults to one per user)
    #[arg(long = "max-concurrency")]
    pub max_concurrency: Option<PositiveUsize>,

    /// Path to a TOML or JSON config file (defaults to netpulse.toml/netpulse.json if present)
    #[arg(long, short)]
    pub config: Option<String>,

    /// Write the report to this file
    #[arg(long, short)]
    pub output: Option<String>,

    /// Report file format
    #[arg(long = "output-format", default_value = "json", ignore_case = true)]
    pub output_format: OutputFormat,
}

impl LoadArgs {
    /// Number of users to register. `--users` falls back to its default only
    /// when no existing users are configured, so an existing-user list alone
    /// selects login-only mode.
    #[must_use]
    pub fn new_user_count(&self, existing_users: usize) -> usize {
        match self.users {
            Some(users) => users.get(),
            None if existing_users == 0 => DEFAULT_USERS,
            None => 0,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct HttpArgs {
    /// Request URL
    pub url: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "post", ignore_case = true)]
    pub method: HttpMethod,

    /// Authorization header value ('/' is read as a space, e.g. Bearer/abc)
    #[arg(long)]
    pub token: Option<String>,

    /// Extra headers in 'Key: Value' format (repeatable)
    #[arg(long, short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// JSON request payload
    #[arg(long, value_parser = parse_json_arg)]
    pub payload: Option<Value>,

    /// JSON map of form field to file path to upload
    #[arg(long, value_parser = parse_json_arg)]
    pub files: Option<Value>,

    /// Request timeout (supports ms/s/m/h, bare numbers are seconds)
    #[arg(long, default_value = "5s", value_parser = parse_timeout_arg)]
    pub timeout: Duration,

    /// Write the result to this file
    #[arg(long, short)]
    pub output: Option<String>,

    /// Result file format
    #[arg(long = "output-format", default_value = "json", ignore_case = true)]
    pub output_format: OutputFormat,
}
