//! Navigation gate.
//!
//! Feed pages need a signed-in user with a display name. Without a user the
//! app goes to login; a user who skipped profile setup is sent there first.

use std::fmt;

use crate::provider::IdentityProvider;
use crate::types::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Search,
    Create,
    Profile,
    Login,
    Signup,
    ProfileSetup,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Search => "/search",
            Route::Create => "/create",
            Route::Profile => "/profile",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::ProfileSetup => "/profile-setup",
        }
    }

    /// Unknown paths map to `Home`; `/home` is an alias for it.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/search" => Route::Search,
            "/create" => Route::Create,
            "/profile" => Route::Profile,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/profile-setup" => Route::ProfileSetup,
            _ => Route::Home,
        }
    }

    /// Pages that require a complete profile.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Home | Route::Search | Route::Create | Route::Profile)
    }

    /// Sign-in pages, skipped once a user is present.
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::Signup)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// The route actually shown when `requested` is navigated to.
pub fn gate(requested: Route, user: Option<&User>) -> Route {
    let Some(user) = user else {
        return if requested.is_auth_page() {
            requested
        } else {
            Route::Login
        };
    };

    if !user.has_display_name() {
        return Route::ProfileSetup;
    }

    if requested.is_auth_page() {
        return Route::Home;
    }

    requested
}

/// [`gate`] against the provider's current user.
pub fn navigate<P: IdentityProvider>(provider: &P, requested: Route) -> Route {
    let route = gate(requested, provider.current_user().as_ref());
    if route != requested {
        tracing::debug!("Redirecting {} to {}", requested, route);
    }
    route
}
