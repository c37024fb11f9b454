use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use shared::auth::TokenVerifier;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, RateLimiterState,
};
use crate::routes::{health, offers, orders};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub verifier: Arc<TokenVerifier>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let verifier = Arc::new(config.auth.build_verifier()?);
    let config = Arc::new(config);

    // Create rate limiter if rate limiting is enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        verifier,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Shopper routes (guest-friendly where the handler allows it).
    // Rate limiting applies here: checkout and eligibility are the
    // abuse-prone surfaces.
    let shopper_routes = Router::new()
        .route(
            "/api/v1/offers/launch/eligibility",
            get(offers::get_eligibility),
        )
        .route(
            "/api/v1/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route("/api/v1/orders/:order_id", get(orders::get_order))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Admin routes (require the admin role claim)
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/offers/launch",
            get(offers::get_offer_settings).put(offers::update_offer_settings),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Payment relay route; authenticates with the gateway token header
    let gateway_routes = Router::new().route(
        "/api/v1/orders/:order_id/payment",
        post(orders::update_payment_status),
    );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Ok(Router::new()
        .merge(public_routes)
        .merge(shopper_routes)
        .merge(admin_routes)
        .merge(gateway_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors)
        .with_state(state))
}
