//! Admin Credentials
//!
//! One staff account, configured through the environment. The password
//! normally arrives as an argon2 PHC string (`ADMIN_PASSWORD_HASH`); a
//! plaintext `ADMIN_PASSWORD` is accepted as a dev fallback.

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};

use crate::security_log;

#[derive(Debug, Clone)]
enum StoredPassword {
    /// argon2 PHC string
    Hash(String),
    /// Plaintext fallback, dev only
    Plain(String),
}

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password: StoredPassword,
}

impl AdminCredentials {
    /// Load from `ADMIN_USERNAME` / `ADMIN_PASSWORD_HASH` / `ADMIN_PASSWORD`
    pub fn from_env() -> Self {
        let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());

        let password = if let Ok(hash) = std::env::var("ADMIN_PASSWORD_HASH") {
            StoredPassword::Hash(hash)
        } else if let Ok(plain) = std::env::var("ADMIN_PASSWORD") {
            security_log!(
                "WARN",
                "plaintext_admin_password",
                detail = "ADMIN_PASSWORD is set in plaintext; prefer ADMIN_PASSWORD_HASH"
            );
            StoredPassword::Plain(plain)
        } else {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("No admin credentials configured, using dev default");
                StoredPassword::Plain("admin123".to_string())
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("FATAL: ADMIN_PASSWORD_HASH (or ADMIN_PASSWORD) must be set");
            }
        };

        Self { username, password }
    }

    pub fn with_plain(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: StoredPassword::Plain(password.to_string()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a login attempt; usernames compare case-insensitively
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if !self.username.eq_ignore_ascii_case(username.trim()) {
            return false;
        }
        match &self.password {
            StoredPassword::Hash(hash) => match PasswordHash::new(hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(e) => {
                    tracing::error!(target: "security", error = %e, "Malformed ADMIN_PASSWORD_HASH");
                    false
                }
            },
            StoredPassword::Plain(plain) => plain == password,
        }
    }
}
