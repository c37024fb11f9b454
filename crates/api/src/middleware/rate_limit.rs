//! Rate limiting middleware for shopper routes.
//!
//! Checkout and eligibility are the abuse-prone surfaces, so they are rate
//! limited per caller. The caller key is the verified token subject when one
//! is presented, otherwise the forwarded client address.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use std::{
    collections::HashMap,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Type alias for the rate limiter used per caller.
type CallerRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across all requests.
/// Uses a HashMap keyed by caller key with individual rate limiters.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<String, Arc<CallerRateLimiter>>>,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            rate_limit_per_minute,
        }
    }

    /// Get or create a rate limiter for the given caller key.
    fn get_or_create_limiter(&self, caller: &str) -> Arc<CallerRateLimiter> {
        // First try to get existing limiter with read lock
        {
            let limiters = self.limiters.read().unwrap();
            if let Some(limiter) = limiters.get(caller) {
                return limiter.clone();
            }
        }

        // Create new limiter with write lock
        let mut limiters = self.limiters.write().unwrap();

        // Double-check in case another thread created it
        if let Some(limiter) = limiters.get(caller) {
            return limiter.clone();
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.rate_limit_per_minute).unwrap_or(NonZeroU32::new(100).unwrap()),
        );
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(caller.to_string(), limiter.clone());
        limiter
    }

    /// Check if a request from the given caller should be allowed.
    /// Returns Ok(()) if allowed, or Err with retry_after seconds if rate limited.
    pub fn check(&self, caller: &str) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(caller);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                // Return retry after in seconds, minimum 1 second
                Err(wait_time.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

/// Derives the caller key for a request.
///
/// A verified bearer subject wins over the network address so authenticated
/// shoppers are limited individually even behind a shared NAT.
fn caller_key(state: &AppState, req: &Request<Body>) -> String {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = token {
        if let Ok(claims) = state.verifier.verify(token) {
            return format!("user:{}", claims.sub);
        }
    }

    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown");

    format!("ip:{}", forwarded)
}

/// Middleware that applies rate limiting per caller on shopper routes.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.clone() else {
        // Limiting disabled by configuration
        return next.run(req).await;
    };

    let caller = caller_key(&state, &req);

    match limiter.check(&caller) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(caller = %caller, retry_after, "Rate limit exceeded");
            let mut response = ApiError::RateLimited.into_response();
            if let Ok(value) = header::HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_within_limit() {
        let state = RateLimiterState::new(10);
        for _ in 0..10 {
            assert!(state.check("user:user_2x9yK").is_ok());
        }
    }

    #[test]
    fn test_blocks_over_limit() {
        let state = RateLimiterState::new(3);
        for _ in 0..3 {
            assert!(state.check("ip:10.0.0.1").is_ok());
        }
        let retry_after = state.check("ip:10.0.0.1").unwrap_err();
        assert!(retry_after >= 1);
    }

    #[test]
    fn test_callers_limited_independently() {
        let state = RateLimiterState::new(2);
        assert!(state.check("ip:10.0.0.1").is_ok());
        assert!(state.check("ip:10.0.0.1").is_ok());
        assert!(state.check("ip:10.0.0.1").is_err());

        // A different caller still has budget
        assert!(state.check("ip:10.0.0.2").is_ok());
    }

    #[test]
    fn test_debug_reports_active_limiters() {
        let state = RateLimiterState::new(5);
        let _ = state.check("ip:10.0.0.1");
        let _ = state.check("ip:10.0.0.2");
        let debug = format!("{:?}", state);
        assert!(debug.contains("active_limiters: 2"));
    }
}
