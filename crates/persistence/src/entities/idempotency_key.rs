//! Idempotency key entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the idempotency_keys table.
///
/// Stores the response snapshot of a completed checkout so a retried
/// submission with the same key replays the original outcome instead of
/// creating a second order.
#[derive(Debug, Clone, FromRow)]
pub struct IdempotencyKeyEntity {
    pub id: i64,
    pub key_hash: String,
    /// Caller the key is scoped to: the user key, or the key hash itself for guests.
    pub scope: String,
    pub response_status: i16,
    pub response_body: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity() -> IdempotencyKeyEntity {
        IdempotencyKeyEntity {
            id: 1,
            key_hash: "abc123def456".to_string(),
            scope: "user_2x9yK".to_string(),
            response_status: 201,
            response_body: json!({"total_amount": 850}),
            created_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::hours(24),
        }
    }

    #[test]
    fn test_entity_fields() {
        let e = entity();
        assert_eq!(e.response_status, 201);
        assert_eq!(e.response_body["total_amount"], 850);
    }

    #[test]
    fn test_entity_expiry_after_creation() {
        let e = entity();
        assert!(e.expires_at > e.created_at);
    }
}
