use std::{str::FromStr, sync::Arc};

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

/// How passwords are stored in the `users` collection and checked at login.
pub trait PasswordScheme: Send + Sync {
    fn name(&self) -> &'static str;

    /// Value written to `User::password`.
    fn hash(&self, password: &str) -> anyhow::Result<String>;

    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Stores passwords as sent. Compatible with existing hand-edited data.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl PasswordScheme for Plaintext {
    fn name(&self) -> &'static str {
        "plaintext"
    }

    fn hash(&self, password: &str) -> anyhow::Result<String> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        password == stored
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Scheme;

impl PasswordScheme for Argon2Scheme {
    fn name(&self) -> &'static str {
        "argon2"
    }

    fn hash(&self, password: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        Ok(password_hash)
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        // A stored value that is not a PHC string never matches.
        let Ok(parsed_hash) = PasswordHash::new(stored) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordSchemeKind {
    #[default]
    Plaintext,
    Argon2,
}

impl PasswordSchemeKind {
    pub fn build(self) -> Arc<dyn PasswordScheme> {
        match self {
            PasswordSchemeKind::Plaintext => Arc::new(Plaintext),
            PasswordSchemeKind::Argon2 => Arc::new(Argon2Scheme),
        }
    }
}

impl FromStr for PasswordSchemeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(PasswordSchemeKind::Plaintext),
            "argon2" => Ok(PasswordSchemeKind::Argon2),
            other => anyhow::bail!("unknown password scheme `{other}`"),
        }
    }
}
