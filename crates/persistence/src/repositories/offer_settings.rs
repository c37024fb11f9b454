//! Repository for offer settings operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::{DiscountTypeDb, OfferSettingEntity};

/// Repository for offer settings database operations.
///
/// One row per offer name, enforced by a unique constraint. Rows are created
/// with column defaults on first read and merged over on update; they are
/// never deleted.
#[derive(Clone)]
pub struct OfferSettingsRepository {
    pool: PgPool,
}

impl OfferSettingsRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets the settings record for an offer name.
    /// Returns None if the record does not exist yet.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<OfferSettingEntity>, sqlx::Error> {
        sqlx::query_as::<_, OfferSettingEntity>(
            r#"
            SELECT id, name, active, discount_type, discount_value, max_orders_per_user,
                   min_order_value, valid_until, created_at, updated_at
            FROM offer_settings
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    /// Gets the settings for an offer name, materializing the default record
    /// if it does not exist.
    pub async fn get_or_create(&self, name: &str) -> Result<OfferSettingEntity, sqlx::Error> {
        if let Some(settings) = self.get_by_name(name).await? {
            return Ok(settings);
        }

        self.create_default(name).await
    }

    /// Creates the default settings record for an offer name.
    ///
    /// Column defaults supply the launch-offer values. The conflict arm is a
    /// no-op assignment so a concurrent first read still returns the row
    /// without touching `updated_at`.
    pub async fn create_default(&self, name: &str) -> Result<OfferSettingEntity, sqlx::Error> {
        sqlx::query_as::<_, OfferSettingEntity>(
            r#"
            INSERT INTO offer_settings (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, active, discount_type, discount_value, max_orders_per_user,
                      min_order_value, valid_until, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    /// Updates offer settings.
    /// Uses upsert pattern: creates if not exists, updates if exists.
    /// The caller resolves the full field set before calling (merge semantics
    /// live in the handler). Last writer wins on concurrent updates.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert(
        &self,
        name: &str,
        active: bool,
        discount_type: DiscountTypeDb,
        discount_value: i64,
        max_orders_per_user: i32,
        min_order_value: i64,
        valid_until: Option<DateTime<Utc>>,
    ) -> Result<OfferSettingEntity, sqlx::Error> {
        sqlx::query_as::<_, OfferSettingEntity>(
            r#"
            INSERT INTO offer_settings (
                name, active, discount_type, discount_value, max_orders_per_user,
                min_order_value, valid_until
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO UPDATE SET
                active = EXCLUDED.active,
                discount_type = EXCLUDED.discount_type,
                discount_value = EXCLUDED.discount_value,
                max_orders_per_user = EXCLUDED.max_orders_per_user,
                min_order_value = EXCLUDED.min_order_value,
                valid_until = EXCLUDED.valid_until,
                updated_at = NOW()
            RETURNING id, name, active, discount_type, discount_value, max_orders_per_user,
                      min_order_value, valid_until, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(active)
        .bind(discount_type)
        .bind(discount_value)
        .bind(max_orders_per_user)
        .bind(min_order_value)
        .bind(valid_until)
        .fetch_one(&self.pool)
        .await
    }
}
