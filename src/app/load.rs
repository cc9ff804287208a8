use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use url::Url;

use netpulse::args::LoadArgs;
use netpulse::error::{AppError, AppResult, ValidationError};
use netpulse::http::{Payload, ReqwestExecutor};
use netpulse::load::{ExistingUser, LoadTestConfig, LoadTester, TracingEventSink};
use netpulse::sinks::write_report;

/// Runs a load test from parsed arguments, prints the summary as pretty JSON
/// and writes it to `--output` when set.
///
/// # Errors
///
/// Returns an error when the arguments are invalid, the user source is
/// misconfigured, or the report cannot be written.
pub(crate) async fn run_load(mut args: LoadArgs, existing_users: Vec<ExistingUser>) -> AppResult<()> {
    let output = args.output.take();
    let output_format = args.output_format;
    let config = build_load_config(args, existing_users)?;

    let executor = Arc::new(ReqwestExecutor::new()?);
    let tester = LoadTester::new(config, executor, Arc::new(TracingEventSink));
    let summary = tester.run().await?;

    let report = serde_json::to_value(&summary)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = output {
        debug!(path = %path, "Persisting load test report");
        write_report(Path::new(&path), output_format, &report).await?;
    }
    Ok(())
}

/// Turns CLI/config arguments into a [`LoadTestConfig`].
pub(crate) fn build_load_config(
    args: LoadArgs,
    existing_users: Vec<ExistingUser>,
) -> AppResult<LoadTestConfig> {
    let raw_url = args
        .url
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
    let base_url = validate_base_url(raw_url)?;

    let num_new_users = args.new_user_count(existing_users.len());
    let target_payload = args
        .payload
        .map(Payload::from_json)
        .transpose()
        .map_err(AppError::http)?;

    let mut config = LoadTestConfig::new(&base_url, &args.target, args.method);
    config.registration_endpoint = args.register_path;
    config.login_endpoint = args.login_path;
    config.num_new_users = num_new_users;
    config.existing_users = existing_users;
    config.start_user_id = args.start_user_id;
    config.delay = args.delay;
    config.auth_header_key = args.auth_header;
    config.auth_token_format = args.token_format;
    config.request_timeout = args.timeout;
    config.error_threshold = args.error_threshold;
    config.target_payload = target_payload;
    config.max_concurrency = args.max_concurrency.map(Into::into);
    Ok(config)
}

fn validate_base_url(raw: &str) -> AppResult<String> {
    let parsed = Url::parse(raw).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    if parsed.host_str().is_none() {
        return Err(AppError::validation(ValidationError::UrlMissingHost));
    }
    Ok(raw.trim_end_matches('/').to_owned())
}
