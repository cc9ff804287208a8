use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{LoadArgs, PositiveUsize, parse_delay_arg, parse_timeout_arg, parse_token_format};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies config file values to `load` arguments. Flags given explicitly on
/// the command line win over the file.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_cli(matches, "users")
        && let Some(users) = config.users
    {
        args.users = Some(ensure_positive(users, "users")?);
    }

    if !is_cli(matches, "delay")
        && let Some(delay) = config.delay.as_ref()
    {
        args.delay = parse_delay_arg(&delay.as_arg())?;
    }

    if !is_cli(matches, "target")
        && let Some(target) = config.target.clone()
    {
        args.target = target;
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = parse_timeout_arg(&timeout.as_arg())?;
    }

    if !is_cli(matches, "payload")
        && let Some(payload) = config.payload.clone()
    {
        args.payload = Some(payload);
    }

    if !is_cli(matches, "start_user_id")
        && let Some(start) = config.start_user_id
    {
        args.start_user_id = start;
    }

    if !is_cli(matches, "login_path")
        && let Some(path) = config.login_path.clone()
    {
        args.login_path = path;
    }

    if !is_cli(matches, "register_path")
        && let Some(path) = config.register_path.clone()
    {
        args.register_path = path;
    }

    if !is_cli(matches, "auth_header")
        && let Some(header) = config.auth_header.clone()
    {
        args.auth_header = header;
    }

    if !is_cli(matches, "token_format")
        && let Some(format) = config.token_format.as_deref()
    {
        args.token_format = parse_token_format(format).map_err(|err| {
            AppError::config(ConfigError::InvalidField {
                field: "token_format",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "error_threshold")
        && let Some(threshold) = config.error_threshold
    {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AppError::config(ConfigError::ThresholdOutOfRange {
                value: threshold,
            }));
        }
        args.error_threshold = threshold;
    }

    if !is_cli(matches, "max_concurrency")
        && let Some(limit) = config.max_concurrency
    {
        args.max_concurrency = Some(ensure_positive(limit, "max_concurrency")?);
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = Some(output);
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive(value: usize, field: &'static str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::InvalidField {
            field,
            source: err,
        })
    })
}
