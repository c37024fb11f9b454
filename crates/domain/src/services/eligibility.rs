//! Launch-offer eligibility evaluation.
//!
//! Evaluation is a pure function over the settings record and the caller's
//! prior-order count; it is recomputed on every pricing request and never
//! cached, since the order count moves between calls.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::offer::OfferSettings;

/// Caller identity for eligibility purposes.
///
/// Guests have no identity to count orders against and are treated as
/// first-time buyers: the per-user cap does not apply to them. The offer's
/// active flag and expiry window apply to everyone.
#[derive(Debug, Clone, Copy)]
pub enum Shopper<'a> {
    Guest,
    Customer {
        user_key: &'a str,
        /// Prior orders for this user, counted regardless of payment status.
        order_count: i64,
    },
}

/// Result of an eligibility evaluation. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Eligibility {
    pub eligible: bool,
    pub order_count: i64,
    pub offer_active: bool,
    pub discount_value: i64,
    pub offer_name: String,
}

/// Evaluates whether the caller currently qualifies for the offer.
///
/// `eligible` requires the offer to be active, the expiry (if any) not to
/// have passed, and — for identified customers — the prior-order count to be
/// below the per-user cap.
pub fn evaluate(settings: &OfferSettings, shopper: Shopper<'_>, now: DateTime<Utc>) -> Eligibility {
    let within_window = settings.valid_until.map_or(true, |until| now <= until);

    let (order_count, under_cap) = match shopper {
        Shopper::Guest => (0, true),
        Shopper::Customer { order_count, .. } => (
            order_count,
            order_count < i64::from(settings.max_orders_per_user),
        ),
    };

    Eligibility {
        eligible: settings.active && within_window && under_cap,
        order_count,
        offer_active: settings.active,
        discount_value: settings.discount_value,
        offer_name: settings.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::offer::{DiscountType, LAUNCH_OFFER_NAME};
    use chrono::Duration;

    fn settings() -> OfferSettings {
        OfferSettings::launch_defaults()
    }

    fn customer(order_count: i64) -> Shopper<'static> {
        Shopper::Customer {
            user_key: "user_2x9yK",
            order_count,
        }
    }

    #[test]
    fn test_first_time_customer_is_eligible() {
        let result = evaluate(&settings(), customer(0), Utc::now());
        assert!(result.eligible);
        assert_eq!(result.order_count, 0);
        assert!(result.offer_active);
        assert_eq!(result.discount_value, 15);
        assert_eq!(result.offer_name, LAUNCH_OFFER_NAME);
    }

    #[test]
    fn test_customer_under_cap_is_eligible() {
        let result = evaluate(&settings(), customer(2), Utc::now());
        assert!(result.eligible);
        assert_eq!(result.order_count, 2);
    }

    #[test]
    fn test_customer_at_cap_is_ineligible() {
        let result = evaluate(&settings(), customer(3), Utc::now());
        assert!(!result.eligible);
        assert_eq!(result.order_count, 3);
    }

    #[test]
    fn test_customer_over_cap_is_ineligible() {
        let result = evaluate(&settings(), customer(17), Utc::now());
        assert!(!result.eligible);
    }

    #[test]
    fn test_guest_is_eligible_with_zero_count() {
        let result = evaluate(&settings(), Shopper::Guest, Utc::now());
        assert!(result.eligible);
        assert_eq!(result.order_count, 0);
    }

    #[test]
    fn test_inactive_offer_blocks_everyone() {
        let mut s = settings();
        s.active = false;

        assert!(!evaluate(&s, customer(0), Utc::now()).eligible);
        assert!(!evaluate(&s, Shopper::Guest, Utc::now()).eligible);
    }

    #[test]
    fn test_inactive_offer_still_reports_state() {
        let mut s = settings();
        s.active = false;

        let result = evaluate(&s, customer(1), Utc::now());
        assert!(!result.offer_active);
        assert_eq!(result.order_count, 1);
        assert_eq!(result.discount_value, 15);
    }

    #[test]
    fn test_expired_offer_is_ineligible() {
        let now = Utc::now();
        let mut s = settings();
        s.valid_until = Some(now - Duration::hours(1));

        assert!(!evaluate(&s, customer(0), now).eligible);
        assert!(!evaluate(&s, Shopper::Guest, now).eligible);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let mut s = settings();
        s.valid_until = Some(now);

        assert!(evaluate(&s, customer(0), now).eligible);
    }

    #[test]
    fn test_future_expiry_is_eligible() {
        let now = Utc::now();
        let mut s = settings();
        s.valid_until = Some(now + Duration::days(30));

        assert!(evaluate(&s, customer(0), now).eligible);
    }

    #[test]
    fn test_raised_cap_restores_eligibility() {
        let mut s = settings();
        s.max_orders_per_user = 10;

        assert!(evaluate(&s, customer(3), Utc::now()).eligible);
    }

    #[test]
    fn test_fixed_discount_value_carried_through() {
        let mut s = settings();
        s.discount_type = DiscountType::Fixed;
        s.discount_value = 500;

        let result = evaluate(&s, customer(0), Utc::now());
        assert_eq!(result.discount_value, 500);
    }

    #[test]
    fn test_serialization_shape() {
        let result = evaluate(&settings(), Shopper::Guest, Utc::now());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["eligible"], true);
        assert_eq!(json["order_count"], 0);
        assert_eq!(json["offer_active"], true);
        assert_eq!(json["discount_value"], 15);
        assert_eq!(json["offer_name"], LAUNCH_OFFER_NAME);
    }
}
