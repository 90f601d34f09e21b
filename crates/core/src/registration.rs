//! Self-registration input rules.
//!
//! Uniqueness of username and email is checked by the caller against the
//! database; everything that can be decided from the input alone lives here.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 150;

/// Letters, digits and `@ . + - _`.
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid regex"));

/// Deliberately loose: one `@`, something on each side, a dot in the domain.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

/// Fields submitted by the registration form.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationInput<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

/// Validate a registration request, checking password confirmation first.
pub fn validate_registration(input: &RegistrationInput<'_>) -> Result<(), CoreError> {
    if input.password != input.confirm_password {
        return Err(CoreError::Validation("Passwords do not match.".into()));
    }
    validate_username(input.username)?;
    validate_email(input.email)?;
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::Validation("Username is required.".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(CoreError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters."
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(CoreError::Validation(
            "Username may contain only letters, digits and @/./+/-/_ characters.".into(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(CoreError::Validation("Enter a valid email address.".into()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn input<'a>(password: &'a str, confirm: &'a str) -> RegistrationInput<'a> {
        RegistrationInput {
            username: "owner_1",
            email: "owner@example.com",
            password,
            confirm_password: confirm,
        }
    }

    #[test]
    fn matching_passwords_pass() {
        assert!(validate_registration(&input("s3cret-pass", "s3cret-pass")).is_ok());
    }

    #[test]
    fn mismatched_passwords_fail() {
        assert_matches!(
            validate_registration(&input("s3cret-pass", "other-pass")),
            Err(CoreError::Validation(msg)) if msg == "Passwords do not match."
        );
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("jane.doe+test@x").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("owner@example.com").is_ok());
        assert!(validate_email("owner@example").is_err());
        assert!(validate_email("owner.example.com").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }
}
