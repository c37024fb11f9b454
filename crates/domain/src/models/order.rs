//! Order domain models.
//!
//! Amounts are whole Indian Rupees carried as `i64`; the storefront does not
//! use paise. The persisted amount fields are always the server-computed ones;
//! client-submitted totals exist in the request types only so old storefront
//! builds keep deserializing, and are never written through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Payment lifecycle of an order. Amount fields never change after creation;
/// only this status (and the gateway reference) may transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A single frame line item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct OrderItem {
    /// Catalog frame reference; absent for fully custom frames.
    pub frame_id: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Item name must be 1-200 characters"))]
    pub name: String,
    /// Unit price in rupees.
    #[validate(custom(function = "shared::validation::validate_unit_price"))]
    pub unit_price: i64,
    #[validate(custom(function = "shared::validation::validate_quantity"))]
    pub quantity: i32,
    /// Uploaded artwork or catalog preview reference.
    #[validate(custom(function = "shared::validation::validate_image_url"))]
    pub image_url: String,
}

/// Shipping address collected at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ShippingAddress {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,
    #[validate(length(min = 1, max = 200, message = "Address line must be 1-200 characters"))]
    pub line1: String,
    #[validate(length(max = 200, message = "Address line must be at most 200 characters"))]
    pub line2: Option<String>,
    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "State must be 1-100 characters"))]
    pub state: String,
    #[validate(custom(function = "shared::validation::validate_pincode"))]
    pub postal_code: String,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: String,
}

/// POST request to place an order.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 50, message = "Order must contain 1-50 items"))]
    #[validate(nested)]
    pub items: Vec<OrderItem>,
    #[validate(nested)]
    pub address: ShippingAddress,
    #[validate(email(message = "Invalid email format"))]
    pub customer_email: String,
    /// Client-computed subtotal. Ignored; the server recomputes from items.
    pub subtotal: Option<i64>,
    /// Client-computed discount. Ignored; the server recomputes.
    pub discount: Option<i64>,
}

/// Internal representation of a placed order.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    /// User key from the identity provider; `None` for guest checkouts.
    pub user_id: Option<String>,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    pub address: ShippingAddress,
    /// Server-computed sum of line items, in rupees.
    pub subtotal: i64,
    /// Present only when the launch offer applied and came out above zero.
    pub discount: Option<i64>,
    pub shipping: i64,
    /// subtotal - discount + shipping; immutable after creation.
    pub total_amount: i64,
    pub payment_status: PaymentStatus,
    /// Reference assigned by the payment gateway once payment is initiated.
    pub gateway_order_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API response for a placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    pub address: ShippingAddress,
    pub subtotal: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
    pub shipping: i64,
    pub total_amount: i64,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_order_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_email: order.customer_email,
            items: order.items,
            address: order.address,
            subtotal: order.subtotal,
            discount: order.discount,
            shipping: order.shipping,
            total_amount: order.total_amount,
            payment_status: order.payment_status,
            gateway_order_id: order.gateway_order_id,
            created_at: order.created_at,
        }
    }
}

/// POST request from the payment relay to transition an order's status.
///
/// The relay is expected to have verified the gateway signature before
/// calling; this endpoint only authenticates the relay itself.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdatePaymentStatusRequest {
    #[validate(length(min = 1, max = 200, message = "Gateway order ID must be 1-200 characters"))]
    pub gateway_order_id: String,
    pub payment_status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_item() -> OrderItem {
        OrderItem {
            frame_id: Some("frame_oak_a4".to_string()),
            name: "Oak A4 Frame".to_string(),
            unit_price: 1499,
            quantity: 2,
            image_url: "https://cdn.framekart.in/uploads/a1.jpg".to_string(),
        }
    }

    fn valid_address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Asha Verma".to_string(),
            line1: "14 MG Road".to_string(),
            line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            phone: "9876543210".to_string(),
        }
    }

    #[test]
    fn test_valid_item_passes() {
        assert!(valid_item().validate().is_ok());
    }

    #[test]
    fn test_item_rejects_zero_price() {
        let mut item = valid_item();
        item.unit_price = 0;
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_item_rejects_negative_price() {
        let mut item = valid_item();
        item.unit_price = -100;
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_item_rejects_zero_quantity() {
        let mut item = valid_item();
        item.quantity = 0;
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_item_rejects_excessive_quantity() {
        let mut item = valid_item();
        item.quantity = shared::validation::MAX_ITEM_QUANTITY + 1;
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_item_rejects_bad_image_reference() {
        let mut item = valid_item();
        item.image_url = "file:///etc/passwd".to_string();
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_address_rejects_bad_phone() {
        let mut address = valid_address();
        address.phone = "12345".to_string();
        assert!(address.validate().is_err());
    }

    #[test]
    fn test_address_rejects_bad_pincode() {
        let mut address = valid_address();
        address.postal_code = "ABC123".to_string();
        assert!(address.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_empty_items() {
        let request = CreateOrderRequest {
            items: vec![],
            address: valid_address(),
            customer_email: "asha@example.com".to_string(),
            subtotal: None,
            discount: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_validates_nested_items() {
        let mut item = valid_item();
        item.quantity = -3;
        let request = CreateOrderRequest {
            items: vec![item],
            address: valid_address(),
            customer_email: "asha@example.com".to_string(),
            subtotal: None,
            discount: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_bad_email() {
        let request = CreateOrderRequest {
            items: vec![valid_item()],
            address: valid_address(),
            customer_email: "not-an-email".to_string(),
            subtotal: None,
            discount: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_accepts_client_totals_without_trusting_them() {
        // Old storefront builds still send these; deserialization must accept them.
        let json = r#"{
            "items": [{
                "frame_id": null,
                "name": "Custom Walnut Frame",
                "unit_price": 2100,
                "quantity": 1,
                "image_url": "https://cdn.framekart.in/uploads/w9.jpg"
            }],
            "address": {
                "full_name": "Asha Verma",
                "line1": "14 MG Road",
                "line2": null,
                "city": "Bengaluru",
                "state": "Karnataka",
                "postal_code": "560001",
                "phone": "9876543210"
            },
            "customer_email": "asha@example.com",
            "subtotal": 1,
            "discount": 2099
        }"#;
        let request: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.subtotal, Some(1));
        assert_eq!(request.discount, Some(2099));
    }

    #[test]
    fn test_payment_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::from_str::<PaymentStatus>("\"failed\"").unwrap(),
            PaymentStatus::Failed
        );
        assert_eq!(PaymentStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_order_response_omits_absent_discount() {
        let order = Order {
            id: Uuid::new_v4(),
            user_id: None,
            customer_email: "asha@example.com".to_string(),
            items: vec![valid_item()],
            address: valid_address(),
            subtotal: 2998,
            discount: None,
            shipping: 0,
            total_amount: 2998,
            payment_status: PaymentStatus::Pending,
            gateway_order_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&OrderResponse::from(order)).unwrap();
        assert!(!json.contains("\"discount\""));
        assert!(json.contains("\"total_amount\":2998"));
    }
}
