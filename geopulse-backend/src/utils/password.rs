// src/utils/password.rs

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(#[from] argon2::password_hash::Error),

    #[error("Weak password: {0}")]
    WeakPassword(String),
}

/// Argon2 hashing for account, GPS source and share link passwords.
#[derive(Clone, Default)]
pub struct PasswordManager {
    argon2: Argon2<'static>,
}

impl PasswordManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::HashingError(e)),
        }
    }

    /// Length policy for account passwords; share link and device passwords are free-form.
    pub fn validate_password_strength(&self, password: &str) -> Result<(), PasswordError> {
        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::WeakPassword(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::WeakPassword(format!(
                "Password must not exceed {} characters",
                MAX_PASSWORD_LENGTH
            )));
        }
        if password.trim().is_empty() {
            return Err(PasswordError::WeakPassword(
                "Password cannot be blank".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let manager = PasswordManager::new();
        let hash = manager.hash_password("correct horse").unwrap();

        assert_ne!(hash, "correct horse");
        assert!(manager.verify_password("correct horse", &hash).unwrap());
        assert!(!manager.verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_password_strength() {
        let manager = PasswordManager::new();
        assert!(manager.validate_password_strength("short").is_err());
        assert!(manager.validate_password_strength("        ").is_err());
        assert!(manager.validate_password_strength("long enough").is_ok());
    }
}
