//! Password hashing using Argon2id.
//!
//! Parameters: memory 16 MiB, iterations 2, parallelism 2. Salt is randomly
//! generated per hash and stored in the PHC string.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};

use super::error::AdminError;

fn hasher() -> Result<Argon2<'static>, AdminError> {
    let params = argon2::Params::new(16 * 1024, 2, 2, None)
        .map_err(|e| AdminError::Internal(format!("argon2 params error: {e}")))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// Hash a plaintext password into a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, AdminError> {
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AdminError::Internal(format!("password hash error: {e}")))?;
    Ok(hash.to_string())
}
