//! Input validation helpers
//!
//! Centralized length limits and field parsers shared by the client
//! handlers. Every helper names the offending field in the error so the
//! roster page can highlight it.

use shared::models::FormValue;

use crate::utils::{AppError, AppResult};

// ── Text length limits ──────────────────────────────────────────────

/// Member names
pub const MAX_NAME_LEN: usize = 200;

/// Notes such as medical condition details
pub const MAX_NOTE_LEN: usize = 500;

/// Indian mobile number length
pub const CONTACT_DIGITS: usize = 10;

/// Aadhaar number length
pub const AADHAAR_DIGITS: usize = 12;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::required_field(field));
    }
    validate_text_len(value, field, max_len)
}

/// Validate that a string is within the length limit.
pub fn validate_text_len(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::out_of_range(
            field,
            format!("{field} is too long ({len} chars, max {max_len})"),
        ));
    }
    Ok(())
}

/// Validate that a value is exactly `len` ASCII digits.
pub fn validate_digits(value: &str, field: &str, len: usize) -> AppResult<()> {
    if value.len() != len || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::invalid_format(
            field,
            format!("{field} must be exactly {len} digits"),
        ));
    }
    Ok(())
}

// ── Numbers ─────────────────────────────────────────────────────────

/// Parse a finite number from a JSON number or numeric string.
pub fn parse_number(value: &FormValue, field: &str) -> AppResult<f64> {
    let parsed = match value {
        FormValue::Number(n) => Some(*n),
        FormValue::Text(s) => s.trim().parse::<f64>().ok(),
        FormValue::Bool(_) => None,
    };
    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(AppError::invalid_format(
            field,
            format!("{field} must be a number"),
        )),
    }
}

/// Parse a number and check it lies in `min..=max`.
pub fn parse_number_in(value: &FormValue, field: &str, min: f64, max: f64) -> AppResult<f64> {
    let n = parse_number(value, field)?;
    if n < min || n > max {
        return Err(AppError::out_of_range(
            field,
            format!("{field} must be between {min} and {max}"),
        ));
    }
    Ok(n)
}

/// Parse a whole number in `min..=max`.
pub fn parse_integer_in(value: &FormValue, field: &str, min: i64, max: i64) -> AppResult<i64> {
    let n = parse_number(value, field)?;
    if n.fract() != 0.0 {
        return Err(AppError::invalid_format(
            field,
            format!("{field} must be a whole number"),
        ));
    }
    if n < min as f64 || n > max as f64 {
        return Err(AppError::out_of_range(
            field,
            format!("{field} must be between {min} and {max}"),
        ));
    }
    Ok(n as i64)
}

/// Parse a checkbox-style flag.
pub fn parse_flag(value: &FormValue, field: &str) -> AppResult<bool> {
    match value {
        FormValue::Bool(b) => Ok(*b),
        FormValue::Number(n) if *n == 1.0 => Ok(true),
        FormValue::Number(n) if *n == 0.0 => Ok(false),
        FormValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" | "" => Ok(false),
            _ => Err(AppError::invalid_format(field, format!("{field} must be true or false"))),
        },
        FormValue::Number(_) => {
            Err(AppError::invalid_format(field, format!("{field} must be true or false")))
        }
    }
}

/// Parse a record id sent as a number or numeric string.
pub fn parse_id(value: Option<&FormValue>) -> AppResult<i64> {
    let value = value
        .filter(|v| !v.is_blank())
        .ok_or_else(|| AppError::required_field("id"))?;
    value
        .as_text()
        .parse::<i64>()
        .map_err(|_| AppError::invalid_format("id", "id must be a client id"))
}
