//! Password hashing (Argon2id)

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;

use crate::utils::AppError;

/// Hash a plaintext password with Argon2id and a fresh salt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash
///
/// Um hash malformado conta como password errada (não como erro interno):
/// o caller devolve sempre a mensagem unificada de credenciais inválidas.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("kwanza-segura-123").unwrap();
        assert!(verify_password("kwanza-segura-123", &hash));
        assert!(!verify_password("outra-password", &hash));
    }

    #[test]
    fn test_malformed_hash_is_rejected() {
        assert!(!verify_password("qualquer", "not-a-phc-string"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("mesma").unwrap();
        let b = hash_password("mesma").unwrap();
        assert_ne!(a, b);
    }
}
