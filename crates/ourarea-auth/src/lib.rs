//! Sign-in for OurArea
//!
//! Email/password accounts through Firebase Authentication, the persisted
//! session, and the navigation gate that keeps signed-out users on the login
//! pages.

pub mod error;
pub mod firebase;
pub mod provider;
pub mod routes;
pub mod session;
pub mod types;
pub mod validate;

pub use error::AuthError;
pub use firebase::FirebaseAuth;
pub use provider::IdentityProvider;
pub use routes::{gate, navigate, Route};
pub use session::SessionStore;
pub use types::{Session, SignUpForm, User};
pub use validate::{is_valid_email, validate_sign_up, MIN_PASSWORD_LENGTH};
