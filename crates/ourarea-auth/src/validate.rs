//! Sign-up form checks run before any network call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AuthError;
use crate::types::SignUpForm;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[allow(clippy::expect_used)]
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check a sign-up form, reporting the first problem found.
///
/// # Errors
/// Returns `AuthError::InvalidInput` with a message suitable for display.
pub fn validate_sign_up(form: &SignUpForm) -> Result<(), AuthError> {
    if form.email.is_empty() || form.password.is_empty() || form.confirm_password.is_empty() {
        return Err(AuthError::InvalidInput("Please fill in all fields".into()));
    }

    if !is_valid_email(&form.email) {
        return Err(AuthError::InvalidInput(
            "Please enter a valid email address".into(),
        ));
    }

    if form.password != form.confirm_password {
        return Err(AuthError::InvalidInput("Passwords do not match".into()));
    }

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::InvalidInput(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}
