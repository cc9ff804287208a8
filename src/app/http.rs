use std::path::Path;

use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use netpulse::args::HttpArgs;
use netpulse::error::{AppError, AppResult, HttpError};
use netpulse::http::{ExecutionRequest, Payload, RequestExecutor, ReqwestExecutor};
use netpulse::sinks::write_report;

const AUTHORIZATION_HEADER: &str = "Authorization";

/// Sends one request through the shared executor and prints the result.
///
/// # Errors
///
/// Returns an error when the URL or payload is invalid or the result cannot
/// be written.
pub(crate) async fn run_http(mut args: HttpArgs) -> AppResult<()> {
    let output = args.output.take();
    let output_format = args.output_format;
    let request = build_http_request(args)?;
    debug!(url = %request.url, method = %request.method, "Sending single request");

    let executor = ReqwestExecutor::new()?;
    let result = executor.execute(request).await;

    let report = serde_json::to_value(&result)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if let Some(path) = output {
        write_report(Path::new(&path), output_format, &report).await?;
    }
    Ok(())
}

pub(crate) fn build_http_request(args: HttpArgs) -> AppResult<ExecutionRequest> {
    Url::parse(&args.url).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: args.url.clone(),
            source: err,
        })
    })?;

    let mut headers = args.headers;
    if let Some(token) = args.token.as_deref() {
        headers.push((AUTHORIZATION_HEADER.to_owned(), token_header_value(token)));
    }

    let payload = match (args.files, args.payload) {
        (Some(files), data) => Some(
            Payload::from_json(json!({ "files": files, "data": data.unwrap_or(Value::Null) }))
                .map_err(AppError::http)?,
        ),
        (None, Some(payload)) => Some(Payload::Json(payload)),
        (None, None) => None,
    };

    Ok(ExecutionRequest {
        url: args.url,
        method: args.method,
        headers,
        payload,
        timeout: args.timeout,
    })
}

/// Shell-friendly token form: `Bearer/abc` becomes `Bearer abc`.
fn token_header_value(token: &str) -> String {
    token.replace('/', " ")
}
