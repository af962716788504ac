//! Reusable form field validators
//!
//! Each validator takes the raw submitted value (`None` when the field was not
//! submitted at all) and either coerces it to its target type or returns the
//! user-facing message it was configured with.

use chrono::NaiveDate;
use std::str::FromStr;

/// Validator: field must be submitted; any string, including an empty one, passes
pub fn required(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<String, String> + Send + Sync + Clone {
    move |value: Option<&str>| match value {
        Some(s) => Ok(s.to_string()),
        None => Err(message.to_string()),
    }
}

/// Validator: coerce the value to a finite number
///
/// A missing or blank value coerces to `0`, leaving the range check to reject
/// it. Surrounding whitespace is ignored.
pub fn coerce_number(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<f64, String> + Send + Sync + Clone {
    move |value: Option<&str>| {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Ok(0.0);
        }

        match trimmed.parse::<f64>() {
            Ok(num) if num.is_finite() => Ok(num),
            _ => Err(message.to_string()),
        }
    }
}

/// Validator: value must parse as one of the variants of `T`
pub fn one_of<T: FromStr>(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<T, String> + Send + Sync + Clone {
    move |value: Option<&str>| {
        value
            .and_then(|s| s.parse::<T>().ok())
            .ok_or_else(|| message.to_string())
    }
}

/// Validator: date must match format
pub fn date_format(
    format: &'static str,
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<NaiveDate, String> + Send + Sync + Clone {
    move |value: Option<&str>| {
        value
            .and_then(|s| NaiveDate::parse_from_str(s, format).ok())
            .ok_or_else(|| message.to_string())
    }
}
