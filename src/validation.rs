//! Field checks applied to creation payloads before they reach the database.
use rust_decimal::Decimal;
use thiserror::Error;

pub const MIN_RFC_LEN: usize = 12;
pub const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

pub fn rfc(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < MIN_RFC_LEN {
        return Err(ValidationError::new(field, format!("must have at least {MIN_RFC_LEN} characters, got {len}")));
    }
    if !value.trim().chars().all(|c| c.is_ascii_alphanumeric() || c == '&' || c == 'Ñ') {
        return Err(ValidationError::new(field, "contains invalid characters"));
    }
    Ok(())
}

pub fn phone(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(ValidationError::new(field, format!("must have at least {MIN_PHONE_DIGITS} digits")));
    }
    Ok(())
}

pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::new(field, "is not a valid email address"));
    }
    Ok(())
}

pub fn non_negative(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new(field, "cannot be negative"));
    }
    Ok(())
}

pub fn percentage(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::new(field, "must be between 0 and 100"));
    }
    Ok(())
}

pub fn non_negative_f64(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(field, "cannot be negative"));
    }
    Ok(())
}

pub fn optional<T: ?Sized, F>(value: Option<&T>, check: F) -> Result<(), ValidationError>
where
    F: FnOnce(&T) -> Result<(), ValidationError>,
{
    value.map_or(Ok(()), check)
}
