//! Password hashing using Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::domain::DomainError;

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
    /// Hash a password with a fresh salt
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id hasher with the crate's default parameters
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::crypto(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        // Rows written before hashing was enforced carry no PHC string
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
