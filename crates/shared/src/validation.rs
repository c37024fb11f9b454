//! Common validation utilities for checkout payloads.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum quantity accepted for a single line item.
pub const MAX_ITEM_QUANTITY: i32 = 25;

/// Maximum unit price in rupees accepted for a single line item.
pub const MAX_UNIT_PRICE: i64 = 10_000_000;

lazy_static! {
    /// Indian mobile number: ten digits starting 6-9.
    static ref PHONE_REGEX: Regex = Regex::new(r"^[6-9][0-9]{9}$").unwrap();
    /// Indian postal (PIN) code: six digits, first non-zero.
    static ref PINCODE_REGEX: Regex = Regex::new(r"^[1-9][0-9]{5}$").unwrap();
    /// Frame artwork reference: http(s) URL with no whitespace.
    static ref IMAGE_URL_REGEX: Regex = Regex::new(r"^https?://\S+$").unwrap();
}

/// Validates that a unit price is positive and below the sanity ceiling.
pub fn validate_unit_price(price: i64) -> Result<(), ValidationError> {
    if price > 0 && price <= MAX_UNIT_PRICE {
        Ok(())
    } else {
        let mut err = ValidationError::new("unit_price_range");
        err.message = Some(format!("Price must be between 1 and {} rupees", MAX_UNIT_PRICE).into());
        Err(err)
    }
}

/// Validates that a line-item quantity is a positive integer within the cap.
pub fn validate_quantity(quantity: i32) -> Result<(), ValidationError> {
    if (1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        Ok(())
    } else {
        let mut err = ValidationError::new("quantity_range");
        err.message =
            Some(format!("Quantity must be between 1 and {}", MAX_ITEM_QUANTITY).into());
        Err(err)
    }
}

/// Validates an uploaded-artwork reference (http or https URL).
pub fn validate_image_url(url: &str) -> Result<(), ValidationError> {
    if IMAGE_URL_REGEX.is_match(url) {
        Ok(())
    } else {
        let mut err = ValidationError::new("image_url_format");
        err.message = Some("Image reference must be an http(s) URL".into());
        Err(err)
    }
}

/// Validates an Indian mobile number.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone must be a 10-digit Indian mobile number".into());
        Err(err)
    }
}

/// Validates an Indian postal (PIN) code.
pub fn validate_pincode(pincode: &str) -> Result<(), ValidationError> {
    if PINCODE_REGEX.is_match(pincode) {
        Ok(())
    } else {
        let mut err = ValidationError::new("pincode_format");
        err.message = Some("Postal code must be a 6-digit PIN code".into());
        Err(err)
    }
}
