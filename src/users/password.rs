use anyhow::Context;
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Argon2 PHC string for `plain`, salted per call.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| anyhow::anyhow!("argon2: {e}"))
}

/// Runs [`hash_password`] on the blocking pool so key stretching does not
/// hold up the async workers.
pub async fn hash_password_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task failed")?
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};

    fn verifies(plain: &str, hash: &str) -> bool {
        let parsed = PasswordHash::new(hash).expect("hash should parse");
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }

    #[test]
    fn hash_verifies_against_original() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2"));
        assert!(verifies(password, &hash));
        assert!(!verifies("wrong-password", &hash));
    }

    #[test]
    fn salts_differ_per_call() {
        let a = hash_password("correct-horse").unwrap();
        let b = hash_password("correct-horse").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn blocking_variant_produces_a_verifiable_hash() {
        let hash = hash_password_blocking("password123".to_string())
            .await
            .expect("hashing should succeed");
        assert!(verifies("password123", &hash));
    }
}
