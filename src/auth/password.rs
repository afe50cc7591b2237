use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use super::AuthError;

/// Argon2id digest of a password, kept as a PHC string
/// (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`) so the parameters travel
/// with the hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    phc: String,
}

impl PasswordHash {
    pub fn new(password: &str) -> Result<Self, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(backend)?
            .to_string();
        Ok(Self { phc })
    }

    /// Wraps a stored PHC string, rejecting anything that does not parse.
    pub fn from_phc(phc: impl Into<String>) -> Result<Self, AuthError> {
        let phc = phc.into();
        password_hash::PasswordHash::new(&phc).map_err(backend)?;
        Ok(Self { phc })
    }

    pub fn as_str(&self) -> &str {
        &self.phc
    }

    /// The digest comparison is constant time.
    pub fn verify(&self, password: &str) -> Result<bool, AuthError> {
        let parsed = password_hash::PasswordHash::new(&self.phc).map_err(backend)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(backend(e)),
        }
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

fn backend(e: password_hash::Error) -> AuthError {
    AuthError::Backend(format!("password hashing failed: {e}"))
}
