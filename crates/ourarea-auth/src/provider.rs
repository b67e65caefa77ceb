use std::future::Future;

use crate::error::AuthError;
use crate::types::{SignUpForm, User};

/// Account backend the app signs in against.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<User>;

    fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, AuthError>> + Send;

    /// Create an account and sign in to it. The form is validated first.
    fn sign_up_with_password(
        &self,
        form: &SignUpForm,
    ) -> impl Future<Output = Result<User, AuthError>> + Send;

    /// Set the display name chosen during profile setup.
    fn update_display_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<User, AuthError>> + Send;

    fn sign_out(&self) -> Result<(), AuthError>;
}
