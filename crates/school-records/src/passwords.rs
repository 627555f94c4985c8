//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...`), so the parameters travel with each hash
//! and verification keeps working after the cost settings change.

use crate::error::ServiceError;
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

#[derive(Clone, Default)]
pub struct PasswordHashing {
    argon2: Argon2<'static>,
}

impl PasswordHashing {
    /// Argon2id with explicit memory (KiB) and iteration costs, one lane.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, ServiceError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| ServiceError::Validation(format!("invalid password hashing cost: {e}")))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash on the blocking pool; Argon2 is deliberately slow.
    pub async fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
        })
        .await
        .map_err(|e| ServiceError::Storage(format!("password hashing task failed: {e}")))?
        .map_err(|e| ServiceError::Validation(format!("password could not be hashed: {e}")))
    }

    /// `false` for a wrong password or an unreadable hash.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hashing = PasswordHashing::with_cost(8, 1).unwrap();
        let hash = hashing.hash("s3cret").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hashing.verify("s3cret", &hash));
        assert!(!hashing.verify("wrong", &hash));
        assert!(!hashing.verify("s3cret", "not a phc string"));
    }

    #[test]
    fn test_rejects_invalid_cost() {
        assert!(PasswordHashing::with_cost(0, 0).is_err());
    }
}
