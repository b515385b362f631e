use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::config::HashConfig;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password does not match")]
    Mismatch,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl From<password_hash::Error> for PasswordError {
    fn from(e: password_hash::Error) -> Self {
        match e {
            password_hash::Error::Password => PasswordError::Mismatch,
            other => PasswordError::Hashing(other.to_string()),
        }
    }
}

/// Argon2id hasher with a fixed cost.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(cfg: &HashConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 parameters: {e}"))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// PHC string with a fresh random salt.
    pub fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(plain.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Cost parameters are read from `hash`, not from this hasher.
    pub fn verify(&self, hash: &str, plain: &str) -> Result<(), PasswordError> {
        let parsed = PasswordHash::new(hash)?;
        self.argon2.verify_password(plain.as_bytes(), &parsed)?;
        Ok(())
    }
}
