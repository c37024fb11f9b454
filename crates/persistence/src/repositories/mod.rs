//! Repository implementations.

pub mod idempotency;
pub mod offer_settings;
pub mod orders;

pub use idempotency::IdempotencyRepository;
pub use offer_settings::OfferSettingsRepository;
pub use orders::OrderRepository;
