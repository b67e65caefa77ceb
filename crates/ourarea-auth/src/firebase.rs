//! Firebase Authentication over the Identity Toolkit REST API.

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::instrument;

use crate::error::AuthError;
use crate::provider::IdentityProvider;
use crate::session::SessionStore;
use crate::types::{Session, SignUpForm, User};
use crate::validate::validate_sign_up;

pub const IDENTITY_TOOLKIT_BASE: &str = "https://identitytoolkit.googleapis.com";
pub const SECURE_TOKEN_BASE: &str = "https://securetoken.googleapis.com";

/// Token lifetime assumed when the response omits `expiresIn`
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

/// Secure Token API reply; unlike the account endpoints it is snake_case.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct FirebaseAuth {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    token_url: String,
    session: RwLock<Option<Session>>,
    store: Option<SessionStore>,
}

impl FirebaseAuth {
    pub fn new(api_key: &str) -> Self {
        Self::with_endpoints(api_key, IDENTITY_TOOLKIT_BASE, SECURE_TOKEN_BASE)
    }

    /// Client with both APIs served from one host (emulator or test server).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self::with_endpoints(api_key, base_url, base_url)
    }

    pub fn with_endpoints(api_key: &str, accounts_base: &str, token_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: accounts_base.trim_end_matches('/').to_string(),
            token_url: format!("{}/v1/token", token_base.trim_end_matches('/')),
            session: RwLock::new(None),
            store: None,
        }
    }

    /// Persist sessions in `store` and restore one from it.
    ///
    /// A session whose id token has lapsed is kept as long as it carries a
    /// refresh token; call [`FirebaseAuth::refresh_if_needed`] to renew it.
    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        match store.load() {
            Ok(Some(session)) if session.is_active() => {
                tracing::info!("Restored session for {}", session.user.email);
                if session.needs_refresh() {
                    tracing::debug!("Restored id token needs refresh");
                }
                *self.session.get_mut() = Some(session);
            }
            Ok(Some(_)) => tracing::info!("Stored session has expired"),
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to restore session: {:#}", e),
        }
        self.store = Some(store);
        self
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    async fn call(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<AccountResponse, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::ApiError("API key not configured".into()));
        }

        let url = format!("{}/v1/accounts:{}", self.base_url, method);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| AuthError::ApiError(format!("JSON parse error: {}", e)));
        }

        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => Err(AuthError::from_api_message(&envelope.error.message)),
            Err(_) => Err(AuthError::ApiError(format!("{}: {}", status, text))),
        }
    }

    /// Exchange the refresh token for a new id token.
    ///
    /// A rejected refresh token ends the session.
    #[instrument(skip(self), level = "info")]
    pub async fn refresh(&self) -> Result<Session, AuthError> {
        let session = self.session().ok_or(AuthError::NotSignedIn)?;
        if !session.can_refresh() {
            self.replace_session(None);
            return Err(AuthError::SessionExpired);
        }
        if self.api_key.is_empty() {
            return Err(AuthError::ApiError("API key not configured".into()));
        }

        let response = self
            .client
            .post(&self.token_url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => AuthError::from_api_message(&envelope.error.message),
                Err(_) => AuthError::ApiError(format!("Token refresh failed: {}: {}", status, text)),
            };
            if err.requires_sign_in() {
                tracing::info!("Refresh token rejected, signing out");
                self.replace_session(None);
            }
            return Err(err);
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::ApiError(format!("JSON parse error: {}", e)))?;
        let expires_in = tokens
            .expires_in
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        let refreshed = Session {
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token.unwrap_or(session.refresh_token),
            expires_at: chrono::Utc::now().timestamp() + expires_in,
            user: session.user,
        };
        self.replace_session(Some(refreshed.clone()));
        tracing::info!("Refreshed id token for {}", refreshed.user.email);
        Ok(refreshed)
    }

    /// Renew the id token if it is expired or about to be.
    /// Returns `Ok(None)` when nobody is signed in.
    pub async fn refresh_if_needed(&self) -> Result<Option<Session>, AuthError> {
        match self.session() {
            None => Ok(None),
            Some(session) if !session.needs_refresh() => Ok(Some(session)),
            // Nothing to renew with, but the id token still works.
            Some(session) if !session.can_refresh() && !session.is_expired() => Ok(Some(session)),
            Some(_) => self.refresh().await.map(Some),
        }
    }

    /// Build a session from a sign-in style response and make it current.
    fn establish(&self, response: AccountResponse, email: &str) -> Result<User, AuthError> {
        let id_token = response
            .id_token
            .ok_or_else(|| AuthError::ApiError("Response missing idToken".into()))?;
        let refresh_token = response
            .refresh_token
            .ok_or_else(|| AuthError::ApiError("Response missing refreshToken".into()))?;
        let expires_in = response
            .expires_in
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        let session = Session {
            user: User {
                uid: response.local_id,
                email: response.email.unwrap_or_else(|| email.to_string()),
                display_name: response.display_name.filter(|n| !n.is_empty()),
            },
            id_token,
            refresh_token,
            expires_at: chrono::Utc::now().timestamp() + expires_in,
        };

        let user = session.user.clone();
        self.replace_session(Some(session));
        Ok(user)
    }

    fn replace_session(&self, session: Option<Session>) {
        if let Some(store) = &self.store {
            let result = match &session {
                Some(session) => store.save(session),
                None => store.clear(),
            };
            if let Err(e) = result {
                tracing::warn!("Failed to persist session: {:#}", e);
            }
        }
        *self.session.write() = session;
    }
}

impl IdentityProvider for FirebaseAuth {
    fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .as_ref()
            .filter(|s| s.is_active())
            .map(|s| s.user.clone())
    }

    #[instrument(skip(self, password), level = "info")]
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput("Please fill in all fields".into()));
        }

        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let response = self.call("signInWithPassword", body).await?;
        let user = self.establish(response, email)?;
        tracing::info!("Signed in as {}", user.email);
        Ok(user)
    }

    #[instrument(skip(self, form), level = "info")]
    async fn sign_up_with_password(&self, form: &SignUpForm) -> Result<User, AuthError> {
        validate_sign_up(form)?;

        let body = serde_json::json!({
            "email": form.email,
            "password": form.password,
            "returnSecureToken": true,
        });
        let response = self.call("signUp", body).await?;
        let user = self.establish(response, &form.email)?;
        tracing::info!("Created account for {}", user.email);
        Ok(user)
    }

    #[instrument(skip(self), level = "info")]
    async fn update_display_name(&self, name: &str) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("Please enter a username".into()));
        }

        let session = self
            .refresh_if_needed()
            .await?
            .ok_or(AuthError::NotSignedIn)?;

        let body = serde_json::json!({
            "idToken": session.id_token,
            "displayName": name,
            "returnSecureToken": true,
        });
        let response = self.call("update", body).await?;

        let updated = Session {
            user: User {
                uid: response.local_id,
                email: response.email.unwrap_or(session.user.email),
                display_name: Some(response.display_name.unwrap_or_else(|| name.to_string())),
            },
            id_token: response.id_token.unwrap_or(session.id_token),
            refresh_token: response.refresh_token.unwrap_or(session.refresh_token),
            expires_at: response
                .expires_in
                .and_then(|s| s.parse::<i64>().ok())
                .map_or(session.expires_at, |secs| chrono::Utc::now().timestamp() + secs),
        };

        let user = updated.user.clone();
        self.replace_session(Some(updated));
        Ok(user)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        self.replace_session(None);
        tracing::info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sign_in_body() -> serde_json::Value {
        serde_json::json!({
            "localId": "uid-1",
            "email": "priya@ourarea.in",
            "displayName": "",
            "idToken": "id-token",
            "refreshToken": "refresh-token",
            "expiresIn": "3600"
        })
    }

    #[tokio::test]
    async fn test_sign_in() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .and(query_param("key", "test_key"))
            .and(body_partial_json(serde_json::json!({
                "email": "priya@ourarea.in",
                "returnSecureToken": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(sign_in_body()))
            .mount(&mock_server)
            .await;

        let auth = FirebaseAuth::with_base_url("test_key", &mock_server.uri());
        let user = auth.sign_in_with_password("priya@ourarea.in", "secret1").await.unwrap();

        assert_eq!(user.uid, "uid-1");
        assert_eq!(user.display_name, None);
        assert!(auth.is_signed_in());
        assert_eq!(auth.session().unwrap().id_token, "id-token");
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "INVALID_LOGIN_CREDENTIALS"}
            })))
            .mount(&mock_server)
            .await;

        let auth = FirebaseAuth::with_base_url("test_key", &mock_server.uri());
        let result = auth.sign_in_with_password("priya@ourarea.in", "wrong").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_validates_before_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sign_in_body()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let auth = FirebaseAuth::with_base_url("test_key", &mock_server.uri());
        let form = SignUpForm {
            email: "priya@ourarea.in".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };

        let result = auth.sign_up_with_password(&form).await;
        assert!(matches!(result, Err(AuthError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_sign_up_email_exists() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signUp"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "EMAIL_EXISTS"}
            })))
            .mount(&mock_server)
            .await;

        let auth = FirebaseAuth::with_base_url("test_key", &mock_server.uri());
        let form = SignUpForm {
            email: "priya@ourarea.in".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };

        let result = auth.sign_up_with_password(&form).await;
        assert!(matches!(result, Err(AuthError::EmailExists)));
    }

    #[tokio::test]
    async fn test_update_display_name_requires_session() {
        let auth = FirebaseAuth::with_base_url("test_key", "http://127.0.0.1:9");
        let result = auth.update_display_name("Priya").await;
        assert!(matches!(result, Err(AuthError::NotSignedIn)));
    }

    fn stored_session(dir: &tempfile::TempDir, expires_in: i64) -> SessionStore {
        let store = SessionStore::in_dir(dir.path());
        store
            .save(&Session {
                user: User {
                    uid: "uid-1".into(),
                    email: "priya@ourarea.in".into(),
                    display_name: Some("Priya".into()),
                },
                id_token: "stale-id-token".into(),
                refresh_token: "refresh-token".into(),
                expires_at: chrono::Utc::now().timestamp() + expires_in,
            })
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_restores_expired_session_and_refreshes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .and(query_param("key", "test_key"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id_token": "fresh-id-token",
                "refresh_token": "refresh-token-2",
                "expires_in": "3600",
                "token_type": "Bearer",
                "user_id": "uid-1"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::TempDir::new().unwrap();
        let auth = FirebaseAuth::with_base_url("test_key", &mock_server.uri())
            .with_session_store(stored_session(&dir, -60));

        let user = auth.current_user().unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Priya"));

        let session = auth.refresh_if_needed().await.unwrap().unwrap();
        assert_eq!(session.id_token, "fresh-id-token");
        assert_eq!(session.refresh_token, "refresh-token-2");
        assert!(!session.needs_refresh());

        let saved = SessionStore::in_dir(dir.path()).load().unwrap().unwrap();
        assert_eq!(saved.id_token, "fresh-id-token");

        // Fresh now, so no second exchange.
        auth.refresh_if_needed().await.unwrap();
    }

    #[tokio::test]
    async fn test_update_display_name_refreshes_first() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id_token": "fresh-id-token",
                "refresh_token": "refresh-token",
                "expires_in": "3600"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:update"))
            .and(body_partial_json(serde_json::json!({
                "idToken": "fresh-id-token",
                "displayName": "Priya S"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "localId": "uid-1",
                "email": "priya@ourarea.in",
                "displayName": "Priya S"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::TempDir::new().unwrap();
        let auth = FirebaseAuth::with_base_url("test_key", &mock_server.uri())
            .with_session_store(stored_session(&dir, 60));

        let user = auth.update_display_name("Priya S").await.unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Priya S"));
        assert_eq!(auth.session().unwrap().id_token, "fresh-id-token");
    }

    #[tokio::test]
    async fn test_rejected_refresh_token_signs_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "INVALID_REFRESH_TOKEN"}
            })))
            .mount(&mock_server)
            .await;

        let dir = tempfile::TempDir::new().unwrap();
        let auth = FirebaseAuth::with_base_url("test_key", &mock_server.uri())
            .with_session_store(stored_session(&dir, -60));
        assert!(auth.is_signed_in());

        let result = auth.refresh_if_needed().await;
        assert!(matches!(result, Err(AuthError::SessionExpired)));
        assert!(auth.current_user().is_none());
        assert!(SessionStore::in_dir(dir.path()).load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let auth = FirebaseAuth::with_base_url("", "http://127.0.0.1:9");
        let result = auth.sign_in_with_password("a@b.co", "secret1").await;
        assert!(matches!(result, Err(AuthError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_unparseable_error_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&mock_server)
            .await;

        let auth = FirebaseAuth::with_base_url("test_key", &mock_server.uri());
        match auth.sign_in_with_password("a@b.co", "secret1").await {
            Err(AuthError::ApiError(msg)) => assert!(msg.contains("503")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
