//! Repository for order operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{OrderEntity, PaymentStatusDb};

/// Fields for a new order row. Amounts are the server-computed ones; there is
/// deliberately no way to write a caller-provided total through this type.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<String>,
    pub customer_email: String,
    pub items: serde_json::Value,
    pub address: serde_json::Value,
    pub subtotal: i64,
    pub discount: Option<i64>,
    pub shipping: i64,
    pub total_amount: i64,
}

/// Repository for order database operations.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Creates a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts one order row with status `pending`.
    pub async fn create(&self, order: NewOrder) -> Result<OrderEntity, sqlx::Error> {
        sqlx::query_as::<_, OrderEntity>(
            r#"
            INSERT INTO orders (
                user_id, customer_email, items, address, subtotal, discount,
                shipping, total_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, customer_email, items, address, subtotal, discount,
                      shipping, total_amount, payment_status, gateway_order_id,
                      created_at, updated_at
            "#,
        )
        .bind(order.user_id)
        .bind(order.customer_email)
        .bind(order.items)
        .bind(order.address)
        .bind(order.subtotal)
        .bind(order.discount)
        .bind(order.shipping)
        .bind(order.total_amount)
        .fetch_one(&self.pool)
        .await
    }

    /// Counts all orders belonging to a user, regardless of payment status.
    ///
    /// Eligibility intentionally counts abandoned and failed checkouts too;
    /// see the order-count decision in DESIGN.md.
    pub async fn count_by_user(&self, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM orders
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Gets an order by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderEntity>, sqlx::Error> {
        sqlx::query_as::<_, OrderEntity>(
            r#"
            SELECT id, user_id, customer_email, items, address, subtotal, discount,
                   shipping, total_amount, payment_status, gateway_order_id,
                   created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists a user's orders, newest first, optionally after a cursor.
    ///
    /// The cursor is a `(created_at, id)` pair; ties on the timestamp are
    /// broken by the ID so pages never skip or repeat rows.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        cursor: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<OrderEntity>, sqlx::Error> {
        match cursor {
            Some((created_at, id)) => {
                sqlx::query_as::<_, OrderEntity>(
                    r#"
                    SELECT id, user_id, customer_email, items, address, subtotal, discount,
                           shipping, total_amount, payment_status, gateway_order_id,
                           created_at, updated_at
                    FROM orders
                    WHERE user_id = $1 AND (created_at, id) < ($2, $3)
                    ORDER BY created_at DESC, id DESC
                    LIMIT $4
                    "#,
                )
                .bind(user_id)
                .bind(created_at)
                .bind(id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, OrderEntity>(
                    r#"
                    SELECT id, user_id, customer_email, items, address, subtotal, discount,
                           shipping, total_amount, payment_status, gateway_order_id,
                           created_at, updated_at
                    FROM orders
                    WHERE user_id = $1
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2
                    "#,
                )
                .bind(user_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    /// Transitions an order's payment status and records the gateway reference.
    ///
    /// Amount fields are never touched here; the WHERE clause restricts the
    /// transition to orders still pending so a settled order cannot flip.
    pub async fn update_payment_status(
        &self,
        id: Uuid,
        gateway_order_id: &str,
        status: PaymentStatusDb,
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        sqlx::query_as::<_, OrderEntity>(
            r#"
            UPDATE orders
            SET payment_status = $2, gateway_order_id = $3, updated_at = NOW()
            WHERE id = $1 AND payment_status = 'pending'
            RETURNING id, user_id, customer_email, items, address, subtotal, discount,
                      shipping, total_amount, payment_status, gateway_order_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(gateway_order_id)
        .fetch_optional(&self.pool)
        .await
    }
}
