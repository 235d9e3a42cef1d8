//! Centralized validation for registration and credential inputs
//!
//! A single source of truth for field validation so the services and the
//! HTTP layer agree on what a well-formed input is. Everything here runs
//! before any hashing or storage work.

use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// Lazy-loaded email validation regex, a practical subset of RFC 5322.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Invalid email regex pattern")
});

/// Validates an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingField(
            "Email is required".to_string(),
        ));
    }

    if email.len() > 254 {
        return Err(ValidationError::InvalidEmail(
            "Email is too long".to_string(),
        ));
    }

    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(format!(
            "Invalid email format: {email}"
        )))
    }
}

/// Validates a password.
///
/// Minimum 6 characters, maximum 128, cannot be empty or whitespace only.
/// The minimum is enforced before hashing on every path that sets a
/// credential (registration and password change).
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingField(
            "Password is required".to_string(),
        ));
    }

    if password.trim().is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password cannot be only whitespace".to_string(),
        ));
    }

    if password.len() < 6 {
        return Err(ValidationError::InvalidPassword(
            "Password must be at least 6 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(ValidationError::InvalidPassword(
            "Password must be no more than 128 characters long".to_string(),
        ));
    }

    Ok(())
}

/// Validates a username: 3-50 characters, not whitespace only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::MissingField(
            "Username is required".to_string(),
        ));
    }

    if username.trim().is_empty() {
        return Err(ValidationError::InvalidUsername(
            "Username cannot be only whitespace".to_string(),
        ));
    }

    if username.len() < 3 {
        return Err(ValidationError::InvalidUsername(
            "Username must be at least 3 characters long".to_string(),
        ));
    }

    if username.len() > 50 {
        return Err(ValidationError::InvalidUsername(
            "Username must be no more than 50 characters long".to_string(),
        ));
    }

    Ok(())
}

/// Validates a person-name field (first or last name): required, max 50 chars.
pub fn validate_name(field: &str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField(format!(
            "{field} is required"
        )));
    }

    if name.len() > 50 {
        return Err(ValidationError::InvalidField(format!(
            "{field} cannot exceed 50 characters"
        )));
    }

    Ok(())
}
