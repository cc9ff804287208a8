use std::path::Path;

use chrono::Utc;
use serde_json::Value;

use crate::args::OutputFormat;
use crate::error::{AppError, AppResult, SinkError};

use super::format::{flatten_columns, render_csv, with_timestamp};

/// Persists a report to `path`, stamped with the current UTC time.
///
/// # Errors
///
/// Returns an error when the report cannot be rendered or the file cannot be
/// written.
pub async fn write_report(path: &Path, format: OutputFormat, report: &Value) -> AppResult<()> {
    let timestamp = Utc::now().to_rfc3339();
    let contents = render_report(format, report, &timestamp)?;
    tokio::fs::write(path, contents).await.map_err(|err| {
        AppError::sink(SinkError::WriteReport {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    tracing::info!(path = %path.display(), format = ?format, "Report written");
    Ok(())
}

pub(super) fn render_report(
    format: OutputFormat,
    report: &Value,
    timestamp: &str,
) -> AppResult<String> {
    let stamped = with_timestamp(report, timestamp);
    match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(&stamped)
                .map_err(|err| AppError::sink(SinkError::SerializeReport { source: err }))?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Csv => render_csv(&flatten_columns(&stamped)?),
    }
}
