//! Password hashing and random identifiers.

use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as _, SaltString};
use rand::rngs::OsRng;

use crate::DeskError;

/// Pluggable password hashing.
///
/// ```rust
/// use eventdesk::crypto::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::default();
/// let hash = hasher.hash("correct horse").unwrap();
/// assert!(hasher.verify("correct horse", &hash).unwrap());
/// assert!(!hasher.verify("battery staple", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
    /// # Errors
    ///
    /// Returns `DeskError::PasswordHashError` if hashing fails.
    fn hash(&self, password: &str) -> Result<String, DeskError>;

    /// Returns `Ok(false)` for a mismatch.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::PasswordHashError` if `hash` is not a PHC string.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DeskError>;
}

/// Argon2id hasher. Stored hashes carry their own parameters, so changing
/// the cost here only affects newly hashed passwords.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    /// KiB
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Hasher {
    #[must_use]
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DeskError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| DeskError::PasswordHashError)?;

        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| DeskError::PasswordHashError)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DeskError> {
        let parsed = PasswordHash::new(hash).map_err(|_| DeskError::PasswordHashError)?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Random alphanumeric string, used for JWT ids.
pub fn generate_token(length: usize) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}
