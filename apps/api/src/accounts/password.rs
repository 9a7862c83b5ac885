//! PBKDF2-HMAC-SHA256 password hashes in Django's encoding:
//! `pbkdf2_sha256$<iterations>$<salt>$<base64 digest>`.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use pbkdf2::pbkdf2_hmac;
use rand::{distributions::Alphanumeric, Rng};
use sha2::Sha256;

pub const ALGORITHM: &str = "pbkdf2_sha256";
const SALT_LEN: usize = 22;
const DIGEST_LEN: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Fresh random salt per call.
    pub fn hash(&self, password: &str) -> String {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LEN)
            .map(char::from)
            .collect();
        encode(password, &salt, self.iterations)
    }

    /// Re-derives with the salt and iteration count stored in `encoded`, so hashes
    /// made under an older work factor still verify.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let mut parts = encoded.splitn(4, '$');
        let (Some(algorithm), Some(iterations), Some(salt), Some(_)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        if algorithm != ALGORITHM {
            return false;
        }
        let Ok(iterations) = iterations.parse::<u32>() else {
            return false;
        };
        constant_time_eq(encode(password, salt, iterations).as_bytes(), encoded.as_bytes())
    }

    /// `hash` on the blocking pool; the derivation is deliberately slow.
    pub async fn hash_async(self, password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || self.hash(&password))
            .await
            .context("password hashing task failed")
    }

    pub async fn verify_async(self, password: String, encoded: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || self.verify(&password, &encoded))
            .await
            .context("password verification task failed")
    }
}

fn encode(password: &str, salt: &str, iterations: u32) -> String {
    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut digest);
    format!("{ALGORITHM}${iterations}${salt}${}", STANDARD.encode(digest))
}

pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = PasswordHasher::new(1_000);
        let encoded = hasher.hash("correct horse");
        assert!(encoded.starts_with("pbkdf2_sha256$1000$"));
        assert_eq!(encoded.split('$').count(), 4);
        assert!(hasher.verify("correct horse", &encoded));
        assert!(!hasher.verify("correct horse ", &encoded));
    }

    #[test]
    fn test_salts_differ_per_hash() {
        let hasher = PasswordHasher::new(1_000);
        assert_ne!(hasher.hash("same"), hasher.hash("same"));
    }

    #[test]
    fn test_stored_iteration_count_wins() {
        let old = PasswordHasher::new(1_000).hash("pw");
        assert!(PasswordHasher::new(5_000).verify("pw", &old));
    }

    #[test]
    fn test_rejects_foreign_or_malformed_encodings() {
        let hasher = PasswordHasher::new(1_000);
        assert!(!hasher.verify("pw", "md5$1$abc$def"));
        assert!(!hasher.verify("pw", "pbkdf2_sha256$lots$abc$def"));
        assert!(!hasher.verify("pw", "plaintext"));
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let hasher = PasswordHasher::new(1_000);
        let encoded = hasher.hash_async("pw".into()).await.unwrap();
        assert!(hasher.verify_async("pw".into(), encoded).await.unwrap());
    }
}
