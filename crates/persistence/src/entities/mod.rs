//! Entity definitions (database row mappings).

pub mod idempotency_key;
pub mod offer_setting;
pub mod order;

pub use idempotency_key::IdempotencyKeyEntity;
pub use offer_setting::{DiscountTypeDb, OfferSettingEntity};
pub use order::{OrderEntity, PaymentStatusDb};
