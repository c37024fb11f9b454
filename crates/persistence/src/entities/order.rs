//! Order entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::order::{Order, OrderItem, PaymentStatus, ShippingAddress};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for payment_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatusDb {
    Pending,
    Completed,
    Failed,
}

impl From<PaymentStatusDb> for PaymentStatus {
    fn from(value: PaymentStatusDb) -> Self {
        match value {
            PaymentStatusDb::Pending => PaymentStatus::Pending,
            PaymentStatusDb::Completed => PaymentStatus::Completed,
            PaymentStatusDb::Failed => PaymentStatus::Failed,
        }
    }
}

impl From<PaymentStatus> for PaymentStatusDb {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Pending => PaymentStatusDb::Pending,
            PaymentStatus::Completed => PaymentStatusDb::Completed,
            PaymentStatus::Failed => PaymentStatusDb::Failed,
        }
    }
}

/// Database row mapping for the orders table.
///
/// Line items and the shipping address are stored as JSONB documents; they
/// are write-once at creation and only ever read back whole.
#[derive(Debug, Clone, FromRow)]
pub struct OrderEntity {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub customer_email: String,
    pub items: serde_json::Value,
    pub address: serde_json::Value,
    pub subtotal: i64,
    pub discount: Option<i64>,
    pub shipping: i64,
    pub total_amount: i64,
    pub payment_status: PaymentStatusDb,
    pub gateway_order_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderEntity {
    /// Converts the row into the domain order, decoding the JSONB documents.
    pub fn into_domain(self) -> Result<Order, serde_json::Error> {
        let items: Vec<OrderItem> = serde_json::from_value(self.items)?;
        let address: ShippingAddress = serde_json::from_value(self.address)?;

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            customer_email: self.customer_email,
            items,
            address,
            subtotal: self.subtotal,
            discount: self.discount,
            shipping: self.shipping,
            total_amount: self.total_amount,
            payment_status: self.payment_status.into(),
            gateway_order_id: self.gateway_order_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity() -> OrderEntity {
        OrderEntity {
            id: Uuid::new_v4(),
            user_id: Some("user_2x9yK".to_string()),
            customer_email: "asha@example.com".to_string(),
            items: json!([{
                "frame_id": "frame_oak_a4",
                "name": "Oak A4 Frame",
                "unit_price": 1499,
                "quantity": 2,
                "image_url": "https://cdn.framekart.in/uploads/a1.jpg"
            }]),
            address: json!({
                "full_name": "Asha Verma",
                "line1": "14 MG Road",
                "line2": null,
                "city": "Bengaluru",
                "state": "Karnataka",
                "postal_code": "560001",
                "phone": "9876543210"
            }),
            subtotal: 2998,
            discount: Some(450),
            shipping: 0,
            total_amount: 2548,
            payment_status: PaymentStatusDb::Pending,
            gateway_order_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_domain() {
        let order = entity().into_domain().unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].unit_price, 1499);
        assert_eq!(order.address.city, "Bengaluru");
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.total_amount, 2548);
    }

    #[test]
    fn test_into_domain_rejects_malformed_items() {
        let mut e = entity();
        e.items = json!({"not": "an array"});
        assert!(e.into_domain().is_err());
    }

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::from(PaymentStatusDb::from(status)), status);
        }
    }
}
