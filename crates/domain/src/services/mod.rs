//! Business logic services.

pub mod eligibility;
pub mod pricing;

pub use eligibility::{evaluate, Eligibility, Shopper};
pub use pricing::{quote, subtotal_of, Quote, FLAT_SHIPPING};
