//! HTTP middleware components.

pub mod admin;
pub mod logging;
pub mod metrics;
pub mod rate_limit;

pub use admin::{require_admin, AdminContext};
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
