// src/auth.rs

//! Password hashing for user accounts
//!
//! Passwords are hashed with Argon2id and a random per-password salt. The
//! result is the PHC string (`$argon2id$v=19$...`) stored as raw bytes, so
//! the parameters travel with the hash and verification needs nothing else.

use crate::error::{Error, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash `password` into an opaque byte string suitable for storage
pub fn hash_password(password: &str) -> Result<Vec<u8>> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(hash.to_string().into_bytes())
}

/// Check `password` against a hash produced by [`hash_password`]
///
/// Returns `false` for a wrong password and for a stored hash that cannot
/// be parsed; the two cases are deliberately indistinguishable.
pub fn verify_password(password: &str, stored_hash: &[u8]) -> bool {
    let Ok(encoded) = std::str::from_utf8(stored_hash) else {
        return false;
    };
    let Ok(parsed) = PasswordHash::new(encoded) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_garbage_hash_fails_closed() {
        assert!(!verify_password("anything", b"not a phc string"));
        assert!(!verify_password("anything", &[0xff, 0xfe]));
    }
}
