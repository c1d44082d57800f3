use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, PasswordHasher as _,
};

use crate::error::AppError;
use crate::Result;

/// Salted one-way password hashing with argon2id.
///
/// The work factor is fixed process-wide so hashing and verification stay
/// consistent; callers cannot tune it per request. Digests are PHC strings
/// carrying the salt and parameters, so `verify` needs no extra state.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    fn argon2() -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, argon2::Version::V0x13, Params::default())
    }

    /// Hash a plaintext password on the calling thread.
    ///
    /// Rejects empty input; never fails for well-formed non-empty input.
    pub fn hash_blocking(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(AppError::ValidationError(
                "password must not be empty".to_string(),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        Self::argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalError(format!("password hashing failed: {}", e)))
    }

    /// Verify a plaintext against a stored digest on the calling thread.
    ///
    /// Returns `false` for any malformed digest instead of an error, so a
    /// corrupted record is indistinguishable from a wrong password.
    pub fn verify_blocking(&self, password: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(hash) => hash,
            Err(_) => return false,
        };

        Self::argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Hash on the blocking thread pool so the CPU-bound work never stalls
    /// unrelated requests on the async workers.
    pub async fn hash(&self, password: String) -> Result<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password))
            .await
            .map_err(|e| AppError::InternalError(format!("hashing task failed: {}", e)))?
    }

    /// Verify on the blocking thread pool; same scheduling rationale as `hash`.
    pub async fn verify(&self, password: String, digest: String) -> Result<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_blocking(&password, &digest))
            .await
            .map_err(|e| AppError::InternalError(format!("verification task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "p@ss1234";

        let digest = hasher.hash_blocking(password).unwrap();

        assert!(hasher.verify_blocking(password, &digest));
        assert!(!hasher.verify_blocking("wrong_password", &digest));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new();
        let password = "p@ss1234";

        let first = hasher.hash_blocking(password).unwrap();
        let second = hasher.hash_blocking(password).unwrap();

        // Different salts, different digests; both still verify
        assert_ne!(first, second);
        assert!(hasher.verify_blocking(password, &first));
        assert!(hasher.verify_blocking(password, &second));
    }

    #[test]
    fn test_empty_password_is_rejected() {
        let hasher = PasswordHasher::new();
        let err = hasher.hash_blocking("").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_malformed_digest_verifies_false() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_blocking("p@ss1234", "not-a-phc-string"));
        assert!(!hasher.verify_blocking("p@ss1234", ""));
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let hasher = PasswordHasher::new();

        let digest = hasher.hash("p@ss1234".to_string()).await.unwrap();
        assert!(hasher
            .verify("p@ss1234".to_string(), digest.clone())
            .await
            .unwrap());
        assert!(!hasher
            .verify("wrong".to_string(), digest)
            .await
            .unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_hashing_proceeds_independently() {
        let hasher = PasswordHasher::new();

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let hasher = hasher.clone();
                tokio::spawn(async move { hasher.hash(format!("password-{}", i)).await })
            })
            .collect();

        for (i, task) in tasks.into_iter().enumerate() {
            let digest = task.await.unwrap().unwrap();
            assert!(hasher.verify_blocking(&format!("password-{}", i), &digest));
        }
    }
}
