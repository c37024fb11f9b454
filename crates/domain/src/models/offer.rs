//! Launch-offer configuration domain models.
//!
//! One settings record per offer name drives discount eligibility and the
//! amounts computed at checkout. Admin updates merge over current values and
//! never delete the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Canonical name of the storefront launch promotion.
pub const LAUNCH_OFFER_NAME: &str = "Launch Offer";

/// Default discount percentage materialized on first read.
pub const DEFAULT_DISCOUNT_VALUE: i64 = 15;

/// Default per-user cap on discounted orders.
pub const DEFAULT_MAX_ORDERS_PER_USER: i32 = 3;

/// Default minimum order value (no minimum).
pub const DEFAULT_MIN_ORDER_VALUE: i64 = 0;

/// How the discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the subtotal (0-100).
    Percent,
    /// `discount_value` is a flat rupee amount, clamped to the subtotal.
    Fixed,
}

/// Internal representation of an offer settings record.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferSettings {
    pub id: Uuid,
    /// Unique offer name; at most one record per name.
    pub name: String,
    pub active: bool,
    pub discount_type: DiscountType,
    /// Percentage for PERCENT, whole rupees for FIXED.
    pub discount_value: i64,
    /// Orders a user may place before losing eligibility.
    pub max_orders_per_user: i32,
    /// Subtotals below this value earn no discount.
    pub min_order_value: i64,
    /// Offer expiry; `None` means no expiry.
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OfferSettings {
    /// The hardcoded launch-offer defaults.
    ///
    /// These are exactly the values the configuration store materializes on
    /// first read, so the eligibility read path's fallback and the persisted
    /// default can never disagree.
    pub fn launch_defaults() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            name: LAUNCH_OFFER_NAME.to_string(),
            active: true,
            discount_type: DiscountType::Percent,
            discount_value: DEFAULT_DISCOUNT_VALUE,
            max_orders_per_user: DEFAULT_MAX_ORDERS_PER_USER,
            min_order_value: DEFAULT_MIN_ORDER_VALUE,
            valid_until: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// GET/PUT response for offer settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OfferSettingsResponse {
    pub name: String,
    pub active: bool,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub max_orders_per_user: i32,
    pub min_order_value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<OfferSettings> for OfferSettingsResponse {
    fn from(settings: OfferSettings) -> Self {
        Self {
            name: settings.name,
            active: settings.active,
            discount_type: settings.discount_type,
            discount_value: settings.discount_value,
            max_orders_per_user: settings.max_orders_per_user,
            min_order_value: settings.min_order_value,
            valid_until: settings.valid_until,
            updated_at: settings.updated_at,
        }
    }
}

/// PUT request to update offer settings.
///
/// Absent fields keep their current values. `clear_valid_until` removes the
/// expiry regardless of `valid_until`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateOfferSettingsRequest {
    pub active: Option<bool>,
    pub discount_type: Option<DiscountType>,
    #[validate(range(min = 0, message = "Discount value must be non-negative"))]
    pub discount_value: Option<i64>,
    #[validate(range(min = 1, max = 1000, message = "Per-user cap must be 1-1000 orders"))]
    pub max_orders_per_user: Option<i32>,
    #[validate(range(min = 0, message = "Minimum order value must be non-negative"))]
    pub min_order_value: Option<i64>,
    pub valid_until: Option<DateTime<Utc>>,
    /// Clear the existing expiry (if true, ignores valid_until)
    #[serde(default)]
    pub clear_valid_until: bool,
}
