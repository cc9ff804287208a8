use std::time::Duration;

use serde_json::Value;

use super::defaults::TOKEN_PLACEHOLDER;
use crate::error::{AppError, AppResult, ValidationError};

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, value)) => Ok((key.trim().to_owned(), value.trim().to_owned())),
        None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

/// Request timeout; a bare number is read as seconds and zero is rejected.
pub(crate) fn parse_timeout_arg(s: &str) -> AppResult<Duration> {
    let duration = parse_duration_with_default_unit(s, "s")?;
    if duration.is_zero() {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(duration)
}

/// Think-time between login and the target request; a bare number is read
/// as milliseconds and zero disables the pause.
pub(crate) fn parse_delay_arg(s: &str) -> AppResult<Duration> {
    parse_duration_with_default_unit(s, "ms")
}

fn parse_duration_with_default_unit(s: &str, default_unit: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }

    let mut digits_len = 0usize;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits_len = digits_len.saturating_add(1);
        } else {
            break;
        }
    }
    if digits_len == 0 {
        return Err(AppError::validation(
            ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            },
        ));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let unit = if unit_part.is_empty() {
        default_unit
    } else {
        unit_part
    };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number
                .checked_mul(60)
                .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|seconds| seconds.checked_mul(60))
                .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;
            Duration::from_secs(secs)
        }
        _ => {
            return Err(AppError::validation(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            }));
        }
    };

    Ok(duration)
}

pub(crate) fn parse_json_arg(s: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(s).map_err(|err| ValidationError::InvalidJson {
        value: s.to_owned(),
        source: err,
    })
}

/// Parses a fraction in `[0, 1]`, such as an error-rate ceiling.
pub(crate) fn parse_ratio(s: &str) -> Result<f64, ValidationError> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|err| ValidationError::InvalidRatio {
            value: s.to_owned(),
            source: err,
        })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::RatioOutOfRange { value });
    }
    Ok(value)
}

pub(crate) fn parse_token_format(s: &str) -> Result<String, ValidationError> {
    if s.contains(TOKEN_PLACEHOLDER) {
        Ok(s.to_owned())
    } else {
        Err(ValidationError::TokenFormatMissingPlaceholder {
            value: s.to_owned(),
        })
    }
}
