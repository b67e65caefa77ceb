use serde::{Deserialize, Serialize};

/// Renew the id token this long before it expires.
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// Signed-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl User {
    /// Whether profile setup has been completed.
    pub fn has_display_name(&self) -> bool {
        self.display_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}

/// Signed-in user plus the tokens backing the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub id_token: String,
    pub refresh_token: String,

    /// Token expiration timestamp (Unix timestamp)
    pub expires_at: i64,
}

impl Session {
    /// The id token expires within [`REFRESH_MARGIN_SECS`].
    pub fn needs_refresh(&self) -> bool {
        chrono::Utc::now().timestamp() + REFRESH_MARGIN_SECS >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.expires_at
    }

    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Still usable: the id token is live or can be renewed.
    pub fn is_active(&self) -> bool {
        !self.is_expired() || self.can_refresh()
    }
}

/// Sign-up form input
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in: i64) -> Session {
        Session {
            user: User {
                uid: "u1".into(),
                email: "a@b.co".into(),
                display_name: None,
            },
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: chrono::Utc::now().timestamp() + expires_in,
        }
    }

    #[test]
    fn test_refresh_window() {
        assert!(!session(3600).needs_refresh());
        assert!(session(REFRESH_MARGIN_SECS - 60).needs_refresh());
        assert!(!session(REFRESH_MARGIN_SECS - 60).is_expired());
    }

    #[test]
    fn test_expired_session_stays_active_with_refresh_token() {
        let mut stale = session(-60);
        assert!(stale.is_expired());
        assert!(stale.is_active());

        stale.refresh_token.clear();
        assert!(!stale.can_refresh());
        assert!(!stale.is_active());
    }

    #[test]
    fn test_blank_display_name_is_missing() {
        let mut user = session(0).user;
        assert!(!user.has_display_name());
        user.display_name = Some("  ".into());
        assert!(!user.has_display_name());
        user.display_name = Some("Priya".into());
        assert!(user.has_display_name());
    }
}
