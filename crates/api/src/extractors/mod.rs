//! Request extractors.

pub mod idempotency_key;
pub mod user_auth;

pub use idempotency_key::{IdempotencyKey, OptionalIdempotencyKey};
pub use user_auth::{OptionalUserAuth, UserAuth};
