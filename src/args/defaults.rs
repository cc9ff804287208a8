pub(crate) const DEFAULT_USER_AGENT: &str = concat!("netpulse/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_USERS: usize = 10;
pub(crate) const DEFAULT_START_USER_ID: u64 = 101;
pub(crate) const DEFAULT_DELAY_MS: u64 = 50;
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub(crate) const DEFAULT_ERROR_THRESHOLD: f64 = 0.05;

pub(crate) const DEFAULT_TARGET_PATH: &str = "/GET";
pub(crate) const DEFAULT_LOGIN_PATH: &str = "/api/v1/login";
pub(crate) const DEFAULT_REGISTER_PATH: &str = "/api/v1/register";

pub(crate) const DEFAULT_AUTH_HEADER: &str = "Authorization";
pub(crate) const TOKEN_PLACEHOLDER: &str = "{token}";
pub(crate) const DEFAULT_TOKEN_FORMAT: &str = "Bearer {token}";
