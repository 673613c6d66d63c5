//! Password hashing value object.
//!
//! Wraps Argon2 hashing and verification so the rest of the code never
//! touches raw hash strings. Plain-text passwords exist only as
//! short-lived `&str` arguments.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hash verified against when login hits an unknown email, so that the
/// response time does not reveal whether the account exists.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    // Hashing a fixed string at startup keeps the work factor identical
    // to a real verification.
    Password::hash_raw("timing-equalizer").unwrap_or_default()
});

/// An Argon2 password hash.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password, enforcing the minimum length first.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.len() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let hash = Self::hash_raw(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// The hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain-text candidate against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        PasswordHash::new(&self.hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Burn the same amount of work as a real verification and always
    /// fail. Called on login attempts for unknown emails.
    pub fn verify_dummy(plain_text: &str) {
        let _ = Password::from_hash(DUMMY_HASH.clone()).verify(plain_text);
    }

    fn hash_raw(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {e}")))?;
        Ok(hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_original_and_rejects_wrong_password() {
        let password = Password::new("SecurePassword123!").unwrap();
        assert!(password.verify("SecurePassword123!"));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn hash_survives_storage_round_trip() {
        let password = Password::new("TestPassword123").unwrap();
        let restored = Password::from_hash(password.as_str().to_string());
        assert!(restored.verify("TestPassword123"));
    }

    #[test]
    fn same_password_salts_differently() {
        let first = Password::new("SamePassword123").unwrap();
        let second = Password::new("SamePassword123").unwrap();
        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify("SamePassword123"));
        assert!(second.verify("SamePassword123"));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(Password::new("short").is_err());
        assert!(Password::new("12345678").is_ok());
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        let broken = Password::from_hash("not-a-phc-string".to_string());
        assert!(!broken.verify("anything"));
    }
}
