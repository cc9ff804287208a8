use std::fmt::Write as _;

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult, SinkError};

pub(super) const TIMESTAMP_FIELD: &str = "_timestamp";

/// Returns the report with a `_timestamp` field. Non-object reports are
/// wrapped under `report`.
pub(super) fn with_timestamp(report: &Value, timestamp: &str) -> Value {
    let mut object = match report {
        Value::Object(map) => map.clone(),
        other => {
            let mut map = Map::new();
            map.insert("report".to_owned(), other.clone());
            map
        }
    };
    object.insert(TIMESTAMP_FIELD.to_owned(), Value::String(timestamp.to_owned()));
    Value::Object(object)
}

/// Flattens nested objects into dotted column names. Arrays are kept as
/// JSON text in a single column.
pub(super) fn flatten_columns(report: &Value) -> AppResult<Vec<(String, String)>> {
    let Value::Object(map) = report else {
        return Err(AppError::sink(SinkError::CsvRequiresObject));
    };
    let mut columns = Vec::new();
    flatten_into(&mut columns, None, map)?;
    Ok(columns)
}

fn flatten_into(
    columns: &mut Vec<(String, String)>,
    prefix: Option<&str>,
    map: &Map<String, Value>,
) -> AppResult<()> {
    for (key, value) in map {
        let name = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) => flatten_into(columns, Some(&name), inner)?,
            Value::Null => columns.push((name, String::new())),
            Value::String(text) => columns.push((name, text.clone())),
            Value::Bool(_) | Value::Number(_) => columns.push((name, value.to_string())),
            Value::Array(_) => {
                let text = serde_json::to_string(value)
                    .map_err(|err| AppError::sink(SinkError::SerializeReport { source: err }))?;
                columns.push((name, text));
            }
        }
    }
    Ok(())
}

/// Renders a header line and one data line.
pub(super) fn render_csv(columns: &[(String, String)]) -> AppResult<String> {
    let mut output = String::new();
    let header: Vec<String> = columns.iter().map(|(name, _)| csv_field(name)).collect();
    let row: Vec<String> = columns.iter().map(|(_, value)| csv_field(value)).collect();
    write_line(&mut output, &header.join(","))?;
    write_line(&mut output, &row.join(","))?;
    Ok(output)
}

pub(super) fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

fn write_line(output: &mut String, line: &str) -> AppResult<()> {
    writeln!(output, "{}", line).map_err(|err| AppError::sink(SinkError::FormatCsv { source: err }))
}
