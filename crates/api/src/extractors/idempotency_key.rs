//! Idempotency key header extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::crypto::sha256_hex;

use crate::error::ApiError;

/// The header name for idempotency keys.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Idempotency key extracted from request headers.
///
/// The key is hashed using SHA-256 for storage.
#[derive(Debug, Clone)]
pub struct IdempotencyKey {
    /// SHA-256 hash of the key for database storage.
    pub hash: String,
}

impl IdempotencyKey {
    /// Create a new IdempotencyKey from the original header value.
    pub fn new(original: &str) -> Self {
        Self {
            hash: sha256_hex(original),
        }
    }
}

/// Optional idempotency key extractor.
/// Returns `None` if the header is not present.
#[derive(Debug, Clone)]
pub struct OptionalIdempotencyKey(pub Option<IdempotencyKey>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalIdempotencyKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(IDEMPOTENCY_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(IdempotencyKey::new);

        Ok(OptionalIdempotencyKey(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotency_key_creation() {
        let key = IdempotencyKey::new("checkout-retry-123");
        assert_eq!(key.hash.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_idempotency_key_hash_deterministic() {
        let key1 = IdempotencyKey::new("same-key");
        let key2 = IdempotencyKey::new("same-key");
        assert_eq!(key1.hash, key2.hash);
    }

    #[test]
    fn test_idempotency_key_hash_different_for_different_keys() {
        let key1 = IdempotencyKey::new("key-1");
        let key2 = IdempotencyKey::new("key-2");
        assert_ne!(key1.hash, key2.hash);
    }

    #[test]
    fn test_optional_idempotency_key_none() {
        let opt = OptionalIdempotencyKey(None);
        assert!(opt.0.is_none());
    }

    #[test]
    fn test_header_constant() {
        assert_eq!(IDEMPOTENCY_KEY_HEADER, "idempotency-key");
    }
}
