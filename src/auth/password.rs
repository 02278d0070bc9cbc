//! Password hashing and verification using Argon2id

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Credential store failures. Neither variant carries the plaintext or the hash.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password")]
    Hashing,

    #[error("stored password hash is malformed")]
    CorruptHash,
}

/// Well-formed hash with the same parameters as [`PasswordHasher::new`].
/// No password verifies against it; it only exists so that a login for an
/// unknown account pays the same Argon2 cost as a wrong password.
const ABSENT_ACCOUNT_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Password hasher with a fixed work factor
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// m=19MiB, t=2 iterations, p=1 lane (OWASP minimum for Argon2id)
    pub const MEMORY_COST_KIB: u32 = 19 * 1024;
    pub const TIME_COST: u32 = 2;
    pub const PARALLELISM: u32 = 1;

    pub fn new() -> Self {
        let params = Params::new(Self::MEMORY_COST_KIB, Self::TIME_COST, Self::PARALLELISM, None)
            .expect("Invalid Argon2 params");

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Self { argon2 }
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to hash password");
                PasswordError::Hashing
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// A mismatch is `Ok(false)`; only an unparsable hash is an error.
    pub fn verify(&self, hash: &str, password: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| {
            tracing::warn!("Stored password hash could not be parsed");
            PasswordError::CorruptHash
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is unusable");
                Err(PasswordError::CorruptHash)
            }
        }
    }
}

impl PasswordHasher {
    /// Run a full verification for an account that does not exist.
    pub fn verify_absent(&self, password: &str) {
        let _ = self.verify(ABSENT_ACCOUNT_HASH, password);
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
