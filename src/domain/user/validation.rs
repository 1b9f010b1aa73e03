//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Loose shape check: one `@`, no whitespace, a dot in the domain part
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email '{0}' is not a valid address")]
    InvalidEmail(String),

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyName);
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Minimum 8 characters
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Canonical form used before an email is encrypted or compared
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_name("Ada").is_ok());
        assert!(validate_name("Ada Lovelace").is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(validate_name("   "), Err(UserValidationError::EmptyName));
    }

    #[test]
    fn test_name_too_long() {
        let long_name = "a".repeat(101);
        assert_eq!(
            validate_name(&long_name),
            Err(UserValidationError::NameTooLong(100))
        );
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("space in@example.com").is_err());
        assert!(validate_email("ada@localhost").is_err());
    }

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("12345678").is_ok());
        assert_eq!(
            validate_password("1234567"),
            Err(UserValidationError::PasswordTooShort(8))
        );
        assert_eq!(
            validate_password(&"a".repeat(129)),
            Err(UserValidationError::PasswordTooLong(128))
        );
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
