//! Login session.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::PersistedState;
use crate::auth::{check_credentials, AuthUser};
use crate::config::AuthConfig;
use crate::error::{Error, Result};

/// Storage key of the login session.
pub const AUTH_KEY: &str = "auth-storage";

/// Login session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// The logged-in user, if any.
    pub user: Option<AuthUser>,
    /// Set while a login attempt is in flight.
    pub is_loading: bool,
    /// Message from the last failed attempt.
    pub error: Option<String>,
}

/// Persisted part of [`AuthState`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    /// The logged-in user, if any.
    #[serde(default)]
    pub user: Option<AuthUser>,
}

impl AuthState {
    /// Check whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Log in with the configured account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] and records the message when
    /// the email or password does not match.
    pub fn login(&mut self, config: &AuthConfig, email: &str, password: &str) -> Result<AuthUser> {
        self.is_loading = true;
        self.error = None;

        let outcome = check_credentials(config, email, password);
        self.is_loading = false;

        if let Some(user) = outcome {
            info!("Logged in as {}", user.email);
            self.user = Some(user.clone());
            Ok(user)
        } else {
            warn!("Rejected login for {email}");
            self.error = Some(Error::InvalidCredentials.to_string());
            Err(Error::InvalidCredentials)
        }
    }

    /// End the session.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!("Logged out {}", user.email);
        }
        self.error = None;
    }

    /// Dismiss the last error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// The logged-in user, or [`Error::NotAuthenticated`].
    ///
    /// # Errors
    ///
    /// Returns an error when nobody is logged in.
    pub fn require_user(&self) -> Result<&AuthUser> {
        self.user.as_ref().ok_or(Error::NotAuthenticated)
    }
}

impl PersistedState for AuthState {
    const KEY: &'static str = AUTH_KEY;
    type Snapshot = AuthSnapshot;

    fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            user: self.user.clone(),
        }
    }

    fn restore(&mut self, snapshot: AuthSnapshot) {
        self.user = snapshot.user;
    }
}
