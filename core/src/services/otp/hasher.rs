//! Salted hashing of one-time codes

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use hs_shared::config::otp::{MAX_HASH_COST, MIN_HASH_COST};

use crate::errors::{DomainError, DomainResult};

/// Hashing primitive for one-time codes.
///
/// `verify` must compare without leaking timing information; callers never
/// compare hashes with string equality.
pub trait CodeHasher: Send + Sync {
    /// Produce a salted, irreversible hash of `code`
    fn hash(&self, code: &str) -> DomainResult<String>;

    /// Check `code` against a hash produced by [`CodeHasher::hash`]
    fn verify(&self, code: &str, hash: &str) -> DomainResult<bool>;
}

/// bcrypt-backed hasher, the default for issued codes
#[derive(Debug, Clone, Copy)]
pub struct BcryptCodeHasher {
    cost: u32,
}

impl BcryptCodeHasher {
    pub fn new(cost: u32) -> DomainResult<Self> {
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) {
            return Err(DomainError::Validation {
                message: format!(
                    "bcrypt cost must be between {} and {}, got {}",
                    MIN_HASH_COST, MAX_HASH_COST, cost
                ),
            });
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptCodeHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl CodeHasher for BcryptCodeHasher {
    fn hash(&self, code: &str) -> DomainResult<String> {
        bcrypt::hash(code, self.cost)
            .map_err(|e| DomainError::internal(format!("Failed to hash verification code: {}", e)))
    }

    fn verify(&self, code: &str, hash: &str) -> DomainResult<bool> {
        bcrypt::verify(code, hash)
            .map_err(|e| DomainError::internal(format!("Failed to verify code hash: {}", e)))
    }
}

const SALT_LEN: usize = 16;

/// SHA-256 over a random per-code salt.
///
/// Much cheaper than bcrypt; suitable where codes are short-lived and the
/// attempt cap is the main brute-force defence. Stored as `hex(salt)$hex(digest)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SaltedSha256CodeHasher;

impl SaltedSha256CodeHasher {
    fn digest(salt: &[u8], code: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(code.as_bytes());
        hasher.finalize().to_vec()
    }
}

impl CodeHasher for SaltedSha256CodeHasher {
    fn hash(&self, code: &str) -> DomainResult<String> {
        let mut salt = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| DomainError::internal(format!("Random source unavailable: {}", e)))?;

        let digest = Self::digest(&salt, code);
        Ok(format!("{}${}", hex::encode(salt), hex::encode(digest)))
    }

    fn verify(&self, code: &str, hash: &str) -> DomainResult<bool> {
        let (salt_hex, digest_hex) = hash
            .split_once('$')
            .ok_or_else(|| DomainError::internal("Malformed code hash"))?;

        let salt = hex::decode(salt_hex)
            .map_err(|e| DomainError::internal(format!("Malformed code hash salt: {}", e)))?;
        let expected = hex::decode(digest_hex)
            .map_err(|e| DomainError::internal(format!("Malformed code hash digest: {}", e)))?;

        let actual = Self::digest(&salt, code);
        Ok(expected.len() == actual.len() && constant_time_eq(&expected, &actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_round_trip() {
        let hasher = BcryptCodeHasher::new(4).unwrap();
        let hash = hasher.hash("042317").unwrap();

        assert_ne!(hash, "042317");
        assert!(hasher.verify("042317", &hash).unwrap());
        assert!(!hasher.verify("042318", &hash).unwrap());
    }

    #[test]
    fn test_bcrypt_is_salted() {
        let hasher = BcryptCodeHasher::new(4).unwrap();
        assert_ne!(hasher.hash("123456").unwrap(), hasher.hash("123456").unwrap());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        assert!(BcryptCodeHasher::new(3).is_err());
        assert!(BcryptCodeHasher::new(32).is_err());
        assert_eq!(BcryptCodeHasher::new(4).unwrap().cost(), 4);
    }

    #[test]
    fn test_bcrypt_rejects_malformed_hash() {
        let hasher = BcryptCodeHasher::new(4).unwrap();
        assert!(matches!(
            hasher.verify("123456", "not-a-hash"),
            Err(DomainError::Internal { .. })
        ));
    }

    #[test]
    fn test_sha256_round_trip_and_salt() {
        let hasher = SaltedSha256CodeHasher;
        let first = hasher.hash("000001").unwrap();
        let second = hasher.hash("000001").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("000001", &first).unwrap());
        assert!(hasher.verify("000001", &second).unwrap());
        assert!(!hasher.verify("000002", &first).unwrap());
    }

    #[test]
    fn test_sha256_rejects_malformed_hash() {
        let hasher = SaltedSha256CodeHasher;
        assert!(hasher.verify("123456", "no-separator").is_err());
        assert!(hasher.verify("123456", "zz$00").is_err());
    }
}
