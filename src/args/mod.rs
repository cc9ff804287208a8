//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
mod parsers;
mod types;


pub use cli::{CliArgs, Command, HttpArgs, LoadArgs};
pub use types::{HttpMethod, OutputFormat, PositiveUsize};

pub(crate) use defaults::{
    DEFAULT_AUTH_HEADER, DEFAULT_DELAY_MS, DEFAULT_ERROR_THRESHOLD, DEFAULT_LOGIN_PATH,
    DEFAULT_REGISTER_PATH, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_FORMAT, DEFAULT_USER_AGENT,
    TOKEN_PLACEHOLDER,
};
pub(crate) use parsers::{parse_delay_arg, parse_timeout_arg, parse_token_format};
