//! Password hashing and verification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::PasswordConfig;
use crate::errors::{Error, Result};

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    /// Create Argon2 instance with these parameters.
    fn to_argon2(self) -> Result<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| Error::Hash {
            reason: format!("create argon2 params: {e}"),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Params {
    /// Secure defaults for production (Argon2id RFC recommendations)
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MB
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl From<&PasswordConfig> for Argon2Params {
    fn from(config: &PasswordConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
            parallelism: config.argon2_parallelism,
        }
    }
}

/// Hash a password using Argon2id with the provided parameters, or secure
/// defaults if `None`. No I/O; CPU-heavy, so callers on an async runtime
/// should run this under `spawn_blocking`.
pub fn hash_password_with_params(plain: &str, params: Option<Argon2Params>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = params.unwrap_or_default().to_argon2()?;

    let hash = argon2.hash_password(plain.as_bytes(), &salt).map_err(|e| Error::Hash {
        reason: format!("hash password: {e}"),
    })?;

    Ok(hash.to_string())
}

/// Hash a password using Argon2id with default secure parameters.
pub fn hash_password(plain: &str) -> Result<String> {
    hash_password_with_params(plain, None)
}

/// Verify a candidate password against a stored hash.
///
/// A mismatch is [`Error::Auth`]; a hash that cannot be parsed is
/// [`Error::Hash`]. The comparison inside the verifier is constant-time, so
/// timing does not leak partial matches.
///
/// Note: verification uses the cost parameters embedded in the hash itself.
pub fn verify_password(hash: &str, candidate: &str) -> Result<()> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::Hash {
        reason: format!("parse hash: {e}"),
    })?;

    match Argon2::default().verify_password(candidate.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(()),
        Err(argon2::password_hash::Error::Password) => Err(Error::Auth),
        Err(e) => Err(Error::Hash {
            reason: format!("verify password: {e}"),
        }),
    }
}
