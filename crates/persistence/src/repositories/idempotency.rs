//! Repository for idempotency key operations.

use sqlx::PgPool;

use crate::entities::IdempotencyKeyEntity;

/// How long a stored checkout response can be replayed.
const RETENTION_HOURS: i32 = 24;

/// Repository for idempotency key database operations.
#[derive(Clone)]
pub struct IdempotencyRepository {
    pool: PgPool,
}

impl IdempotencyRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Looks up an unexpired stored response for a key within a caller scope.
    pub async fn find_valid(
        &self,
        key_hash: &str,
        scope: &str,
    ) -> Result<Option<IdempotencyKeyEntity>, sqlx::Error> {
        sqlx::query_as::<_, IdempotencyKeyEntity>(
            r#"
            SELECT id, key_hash, scope, response_status, response_body, created_at, expires_at
            FROM idempotency_keys
            WHERE key_hash = $1 AND scope = $2 AND expires_at > NOW()
            "#,
        )
        .bind(key_hash)
        .bind(scope)
        .fetch_optional(&self.pool)
        .await
    }

    /// Stores a response snapshot for later replay.
    ///
    /// A concurrent duplicate insert loses quietly; the first stored snapshot
    /// is the one that replays.
    pub async fn store(
        &self,
        key_hash: &str,
        scope: &str,
        response_status: i16,
        response_body: serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO idempotency_keys (key_hash, scope, response_status, response_body, expires_at)
            VALUES ($1, $2, $3, $4, NOW() + make_interval(hours => $5))
            ON CONFLICT (key_hash, scope) DO NOTHING
            "#,
        )
        .bind(key_hash)
        .bind(scope)
        .bind(response_status)
        .bind(response_body)
        .bind(RETENTION_HOURS)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
