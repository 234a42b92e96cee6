//! Shared-secret API key validation.

use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Validates presented keys against the single configured secret.
///
/// Only the SHA-256 digest of the secret is kept in memory. Cloning is
/// cheap and the validator is read-only after construction.
#[derive(Clone)]
pub struct ApiKeyValidator {
    expected: Arc<[u8; 32]>,
}

impl ApiKeyValidator {
    /// Create a validator for the configured secret.
    pub fn new(secret: &str) -> Self {
        Self {
            expected: Arc::new(Self::hash_key(secret)),
        }
    }

    /// Hash an API key for comparison.
    pub fn hash_key(key: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hasher.finalize().into()
    }

    /// Fingerprint of the configured key, safe to log.
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.expected[..4])
    }

    /// Check a presented key against the configured secret.
    pub fn validate(&self, key: &str) -> bool {
        let presented = Self::hash_key(key);
        constant_time_eq(self.expected.as_slice(), &presented)
    }
}

impl std::fmt::Debug for ApiKeyValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyValidator")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Constant-time byte comparison.
///
/// Always iterates over the full length of `expected` so response times do
/// not depend on where the first mismatch occurs.
pub fn constant_time_eq(expected: &[u8], provided: &[u8]) -> bool {
    let mut diff = u8::from(expected.len() != provided.len());
    for (i, byte) in expected.iter().enumerate() {
        let p = provided.get(i).copied().unwrap_or(0xff);
        diff |= byte ^ p;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_validation() {
        let validator = ApiKeyValidator::new("sk-test-key-12345");

        assert!(validator.validate("sk-test-key-12345"));
        assert!(!validator.validate("wrong-key"));
        assert!(!validator.validate(""));
        assert!(!validator.validate("sk-test-key-1234"));
        assert!(!validator.validate("SK-TEST-KEY-12345"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let validator = ApiKeyValidator::new("super-secret-value");
        let rendered = format!("{:?}", validator);
        assert!(!rendered.contains("super-secret-value"));
        assert_eq!(validator.fingerprint().len(), 8);
    }
}
