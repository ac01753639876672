use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::Result;

/// Prefix marking a stored credential that can never match a password.
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

/// Derive the stored credential for a raw password.
///
/// `Some` yields an Argon2id PHC string with a fresh random salt. `None` yields
/// an unusable marker followed by random characters, so accounts created
/// without a password (e.g. for invite-based activation) cannot log in until
/// one is set.
pub fn make_password(raw: Option<&str>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    match raw {
        Some(raw) => {
            let hash = Argon2::default().hash_password(raw.as_bytes(), &salt)?;
            Ok(hash.to_string())
        }
        None => Ok(format!("{}{}", UNUSABLE_PASSWORD_PREFIX, salt.as_str())),
    }
}

/// Check a raw password against a stored credential.
///
/// Unusable markers and unparsable hashes never match.
pub fn check_password(raw: &str, encoded: &str) -> bool {
    if encoded.starts_with(UNUSABLE_PASSWORD_PREFIX) {
        return false;
    }
    match PasswordHash::new(encoded) {
        Ok(parsed) => Argon2::default()
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
