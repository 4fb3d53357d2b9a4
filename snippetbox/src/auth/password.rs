//! Password hashing using Argon2id
//!
//! Hashes are PHC strings, so they carry their own algorithm, parameters and
//! salt. Verification reads the parameters back out of the stored hash.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2Hasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::auth::config::PasswordConfig;
use crate::error::{Error, Result};

/// Password hasher using Argon2id
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher from configured cost parameters
    ///
    /// Fails when Argon2 rejects the parameter combination.
    pub fn new(config: &PasswordConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_cost_kib,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(|e| Error::Password(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self { params })
    }

    /// Hash a password into a PHC string (`$argon2id$v=19$m=...`)
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Password(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash
    ///
    /// A wrong password is `Ok(false)`; only a malformed hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| Error::Password(format!("Invalid password hash format: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Password(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}
