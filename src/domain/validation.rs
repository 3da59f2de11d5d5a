//! Field-level input checks shared by events and participants.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

static PHONE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").ok());

/// Trims `value` and rejects it when blank.
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming `field` if the value is empty
/// after trimming.
pub fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Returns `true` for a plausible `local@domain.tld` address.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// Returns `true` for an international-style phone number. Whitespace is
/// ignored, a leading `+` is optional, and at most 16 digits are allowed.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_RE.as_ref().is_some_and(|re| re.is_match(&compact))
}
