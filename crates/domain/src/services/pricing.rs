//! Order total calculation.
//!
//! The quote produced here is the sole authority for the amounts persisted on
//! an order. Totals submitted by clients are never used; the handler recomputes
//! everything from line items and the current offer settings.

use serde::Serialize;

use crate::models::offer::{DiscountType, OfferSettings};
use crate::models::order::OrderItem;
use crate::services::eligibility::Eligibility;

/// Flat shipping charge in rupees. Shipping is free storewide.
pub const FLAT_SHIPPING: i64 = 0;

/// Server-computed pricing breakdown for one checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Quote {
    pub subtotal: i64,
    pub discount: i64,
    pub shipping: i64,
    pub total: i64,
    pub eligible: bool,
}

/// Sums line items into a subtotal, in rupees.
pub fn subtotal_of(items: &[OrderItem]) -> i64 {
    items
        .iter()
        .map(|item| item.unit_price * i64::from(item.quantity))
        .sum()
}

/// Computes discount, shipping and total for a subtotal.
///
/// Invariants: `0 <= discount <= subtotal` and `total >= 0`. An ineligible
/// caller, or a subtotal under the configured minimum, always gets a zero
/// discount. Percent discounts round to the nearest rupee; fixed discounts
/// are clamped to the subtotal so the total can never go negative.
pub fn quote(subtotal: i64, settings: &OfferSettings, eligibility: &Eligibility) -> Quote {
    let raw_discount = if !eligibility.eligible || subtotal < settings.min_order_value {
        0
    } else {
        match settings.discount_type {
            DiscountType::Percent => (subtotal * settings.discount_value + 50) / 100,
            DiscountType::Fixed => settings.discount_value,
        }
    };

    // Misconfigured values (negative, or percent above 100) must still
    // respect 0 <= discount <= subtotal.
    let discount = raw_discount.clamp(0, subtotal);
    let shipping = FLAT_SHIPPING;
    let total = (subtotal - discount + shipping).max(0);

    Quote {
        subtotal,
        discount,
        shipping,
        total,
        eligible: eligibility.eligible,
    }
}
