// JobBoard - core/password.rs
//
// Salted one-way password hashing with Argon2id (random salt per hash,
// PHC string output). Cost parameters are chosen by the `Hasher`; the
// parameters of an existing hash travel inside its PHC string, so any
// `Hasher` can verify any stored hash.
//
// Records created before hashing was introduced hold the password in
// clear. `verify` recognises them by the missing `$argon2` prefix and
// compares exactly; the store upgrades such records on the next login.

use crate::util::constants::ARGON2_PHC_PREFIX;
use crate::util::error::PasswordError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Version};

/// Argon2 cost parameters (memory KiB, iterations, lanes).
pub use argon2::Params as HashParams;

/// Hashes and verifies passwords.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    params: HashParams,
}

impl Hasher {
    /// Hasher with explicit cost parameters. `Hasher::default()` uses the
    /// Argon2 crate's recommended defaults.
    pub fn with_params(params: HashParams) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `plain` into an Argon2 PHC string.
    pub fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(error = %e, "argon2 hash_password failed");
                PasswordError::Hash {
                    reason: e.to_string(),
                }
            })?;
        Ok(hash.to_string())
    }

    /// Check `plain` against a stored value (hash or legacy plaintext).
    ///
    /// A wrong password is `Ok(false)`; only an unparseable hash is an error.
    pub fn verify(&self, plain: &str, stored: &str) -> Result<bool, PasswordError> {
        if !is_hashed(stored) {
            return Ok(plain == stored);
        }
        let parsed = PasswordHash::new(stored).map_err(|e| {
            tracing::error!(error = %e, "argon2 could not parse stored hash");
            PasswordError::MalformedHash {
                reason: e.to_string(),
            }
        })?;
        Ok(self
            .argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

/// True when `stored` is a PHC hash rather than a legacy plaintext value.
pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with(ARGON2_PHC_PREFIX)
}
