//! Mock credential check.
//!
//! There is exactly one account, described by [`AuthConfig`]. The password
//! is kept as a BLAKE3 digest so the plain text never lands in config files.

use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Login identifier.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Compute the BLAKE3 hex digest of a password.
#[must_use]
pub fn hash_password(password: &str) -> String {
    blake3::hash(password.as_bytes()).to_hex().to_string()
}

/// Check a login attempt against the configured account.
///
/// Returns the authenticated user when both the email and the password
/// match exactly, `None` otherwise.
#[must_use]
pub fn check_credentials(config: &AuthConfig, email: &str, password: &str) -> Option<AuthUser> {
    let expected = blake3::Hash::from_hex(&config.password_hash).ok()?;
    // blake3::Hash equality is constant-time
    if email == config.admin_email && blake3::hash(password.as_bytes()) == expected {
        Some(AuthUser {
            email: email.to_string(),
            name: config.admin_name.clone(),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_credentials_accepted() {
        let user = check_credentials(&AuthConfig::default(), "admin@estate.com", "password123")
            .expect("default credentials should match");
        assert_eq!(user.email, "admin@estate.com");
        assert_eq!(user.name, "Admin User");
    }

    #[test]
    fn test_wrong_password_rejected() {
        assert!(check_credentials(&AuthConfig::default(), "admin@estate.com", "password").is_none());
    }

    #[test]
    fn test_wrong_email_rejected() {
        assert!(check_credentials(&AuthConfig::default(), "root@estate.com", "password123").is_none());
    }

    #[test]
    fn test_email_match_is_exact() {
        let config = AuthConfig::default();
        assert!(check_credentials(&config, "Admin@Estate.com", "password123").is_none());
        assert!(check_credentials(&config, " admin@estate.com", "password123").is_none());
    }

    #[test]
    fn test_custom_account() {
        let config = AuthConfig {
            admin_email: "gate@example.org".to_string(),
            admin_name: "Gatekeeper".to_string(),
            password_hash: hash_password("open sesame"),
        };
        let user = check_credentials(&config, "gate@example.org", "open sesame").unwrap();
        assert_eq!(user.name, "Gatekeeper");
    }

    #[test]
    fn test_malformed_digest_never_matches() {
        let config = AuthConfig {
            password_hash: "not-hex".to_string(),
            ..AuthConfig::default()
        };
        assert!(check_credentials(&config, "admin@estate.com", "password123").is_none());
    }

    #[test]
    fn test_hash_password_is_stable() {
        assert_eq!(hash_password("abc"), hash_password("abc"));
        assert_ne!(hash_password("abc"), hash_password("abd"));
        assert_eq!(hash_password("abc").len(), 64);
    }
}
