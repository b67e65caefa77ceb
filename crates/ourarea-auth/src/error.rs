//! Authentication error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No account for this email")]
    EmailNotFound,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailExists,

    #[error("Password too weak")]
    WeakPassword,

    #[error("Account disabled")]
    UserDisabled,

    #[error("Too many attempts")]
    TooManyAttempts,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Session expired")]
    SessionExpired,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl AuthError {
    /// Map an Identity Toolkit error message such as
    /// `"WEAK_PASSWORD : Password should be at least 6 characters"`.
    pub fn from_api_message(message: &str) -> Self {
        let code = message.split(" : ").next().unwrap_or(message).trim();
        match code {
            "EMAIL_NOT_FOUND" => Self::EmailNotFound,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredentials,
            "EMAIL_EXISTS" => Self::EmailExists,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "USER_DISABLED" => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyAttempts,
            "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" | "INVALID_REFRESH_TOKEN" => {
                Self::SessionExpired
            }
            _ => Self::ApiError(message.to_string()),
        }
    }

    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::EmailNotFound => "No account found with this email.".to_string(),
            Self::InvalidCredentials => "Incorrect email or password.".to_string(),
            Self::EmailExists => "An account with this email already exists.".to_string(),
            Self::WeakPassword => "Password must be at least 6 characters long".to_string(),
            Self::UserDisabled => "This account has been disabled.".to_string(),
            Self::TooManyAttempts => {
                "Too many attempts. Please try again later.".to_string()
            }
            Self::NotSignedIn => "Please sign in to continue.".to_string(),
            Self::SessionExpired => "Your session has expired. Please sign in again.".to_string(),
            Self::ApiError(_) => "Something went wrong. Please try again.".to_string(),
            Self::NetworkError(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether the user has to sign in again.
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, Self::NotSignedIn | Self::SessionExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_mapping() {
        assert!(matches!(
            AuthError::from_api_message("EMAIL_EXISTS"),
            AuthError::EmailExists
        ));
        assert!(matches!(
            AuthError::from_api_message("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthError::WeakPassword
        ));
        assert!(matches!(
            AuthError::from_api_message("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            AuthError::from_api_message("INVALID_REFRESH_TOKEN"),
            AuthError::SessionExpired
        ));
        assert!(matches!(
            AuthError::from_api_message("OPERATION_NOT_ALLOWED"),
            AuthError::ApiError(_)
        ));
    }

    #[test]
    fn test_user_messages() {
        let err = AuthError::InvalidInput("Passwords do not match".into());
        assert_eq!(err.user_message(), "Passwords do not match");
        assert!(AuthError::NotSignedIn.user_message().contains("sign in"));
    }

    #[test]
    fn test_requires_sign_in() {
        assert!(AuthError::SessionExpired.requires_sign_in());
        assert!(!AuthError::EmailExists.requires_sign_in());
    }
}
