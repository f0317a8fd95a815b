//! Form validation for the write-side record types.
//!
//! Same rules the mobile forms enforced: short string/length checks plus a
//! strict phone pattern. Validation runs before any store write.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// 10 digits starting with 6-9
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").expect("phone pattern is valid"));

const MIN_NAME_LENGTH: usize = 2;

/// A rejected form field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("name must be at least {MIN_NAME_LENGTH} characters")]
    InvalidName,

    #[error("phone number must be 10 digits starting with 6-9")]
    InvalidPhone,

    #[error("quantity must be a positive number")]
    InvalidQuantity,

    #[error("a location is required")]
    LocationRequired,
}

/// Validate a person's full name
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required("name"));
    }
    if trimmed.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::InvalidName);
    }
    Ok(())
}

/// Validate a donated item name
pub fn validate_item(item: &str) -> Result<(), ValidationError> {
    if item.trim().is_empty() {
        return Err(ValidationError::Required("item"));
    }
    Ok(())
}

/// Validate a phone number
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required("phone"));
    }
    if !PHONE_PATTERN.is_match(trimmed) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Validate a textual quantity (must parse as a positive number)
pub fn validate_quantity(quantity: &str) -> Result<(), ValidationError> {
    let trimmed = quantity.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required("quantity"));
    }
    match trimmed.parse::<f64>() {
        Ok(qty) => validate_quantity_value(qty),
        Err(_) => Err(ValidationError::InvalidQuantity),
    }
}

/// Validate a numeric quantity
pub fn validate_quantity_value(quantity: f64) -> Result<(), ValidationError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ValidationError::InvalidQuantity);
    }
    Ok(())
}

/// Validate a picked location; the (0,0) null island default is treated as
/// "no location picked"
pub fn validate_location(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if latitude == 0.0 && longitude == 0.0 {
        return Err(ValidationError::LocationRequired);
    }
    Ok(())
}
