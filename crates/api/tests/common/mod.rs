//! Common test utilities for integration tests.
//!
//! These tests run against a real PostgreSQL database. Set
//! `TEST_DATABASE_URL` to enable them; without it every test skips cleanly.

// Allow dead code in this module - these are helper utilities that may not be
// used by all integration tests.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::Utc;
use framekart_api::{
    app::create_app,
    config::{
        AuthConfig, Config, DatabaseConfig, GatewayConfig, LoggingConfig, SecurityConfig,
        ServerConfig,
    },
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// HS256 secret shared by the test config and the token helper.
pub const TEST_HS256_SECRET: &str = "framekart-test-secret";

/// Gateway callback token in the test config.
pub const TEST_GATEWAY_TOKEN: &str = "framekart-test-gateway-token";

/// Create a test database pool, or `None` when `TEST_DATABASE_URL` is unset.
pub async fn try_create_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    Some(pool)
}

/// Run migrations on the test database.
pub async fn run_migrations(pool: &PgPool) {
    sqlx::migrate!("../persistence/src/migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");
}

/// Test configuration backed by the HS256 verifier.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: std::env::var("TEST_DATABASE_URL").unwrap_or_default(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            // High enough that test traffic never trips it
            rate_limit_per_minute: 10_000,
        },
        auth: AuthConfig {
            rsa_public_key: String::new(),
            hs256_secret: TEST_HS256_SECRET.to_string(),
            leeway_secs: 30,
        },
        gateway: GatewayConfig {
            callback_token: TEST_GATEWAY_TOKEN.to_string(),
        },
    }
}

/// Build an app router against the given pool, with migrations applied.
pub async fn test_app(pool: PgPool) -> Router {
    run_migrations(&pool).await;
    create_app(test_config(), pool).expect("Failed to build app")
}

#[derive(Serialize)]
struct TestClaims<'a> {
    sub: &'a str,
    role: &'a str,
    exp: i64,
    iat: i64,
}

/// Mint a bearer token the way the identity provider would.
pub fn bearer_token(sub: &str, role: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = TestClaims {
        sub,
        role,
        exp: now + 3600,
        iat: now,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_HS256_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token");
    format!("Bearer {}", token)
}

/// Build a JSON request.
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// Read a JSON response body.
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not JSON")
}

/// A checkout payload with the given line items as (unit_price, quantity).
pub fn order_payload(lines: &[(i64, i32)]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = lines
        .iter()
        .map(|(unit_price, quantity)| {
            serde_json::json!({
                "frame_id": "frame_oak_a4",
                "name": "Oak A4 Frame",
                "unit_price": unit_price,
                "quantity": quantity,
                "image_url": "https://cdn.framekart.in/uploads/a1.jpg"
            })
        })
        .collect();

    serde_json::json!({
        "items": items,
        "address": {
            "full_name": "Asha Verma",
            "line1": "14 MG Road",
            "line2": null,
            "city": "Bengaluru",
            "state": "Karnataka",
            "postal_code": "560001",
            "phone": "9876543210"
        },
        "customer_email": "asha@example.com"
    })
}

/// Reset the launch-offer settings to their defaults through the admin API.
pub async fn reset_offer_defaults(app: &Router) {
    use tower::util::ServiceExt;

    let mut request = json_request(
        "PUT",
        "/api/v1/admin/offers/launch",
        serde_json::json!({
            "active": true,
            "discount_type": "PERCENT",
            "discount_value": 15,
            "max_orders_per_user": 3,
            "min_order_value": 0,
            "clear_valid_until": true
        }),
    );
    request.headers_mut().insert(
        "authorization",
        bearer_token("user_admin_reset", "admin").parse().unwrap(),
    );

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to reset offer settings");
    assert!(
        response.status().is_success(),
        "resetting offer settings failed: {}",
        response.status()
    );
}
