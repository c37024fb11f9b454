//! Back-office authorization middleware.
//!
//! Offer-settings management is restricted to callers whose verified token
//! carries the admin role.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::auth::Role;

use crate::app::AppState;

/// Verified admin identity, inserted into request extensions for handlers.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub user_key: String,
}

/// Middleware for admin-only routes.
///
/// Requires a valid bearer token AND the admin role claim.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let token = match token {
        Some(token) => token,
        None => return unauthorized_response("Missing bearer token"),
    };

    let claims = match state.verifier.verify(token) {
        Ok(claims) => claims,
        Err(_) => return unauthorized_response("Invalid or expired token"),
    };

    if claims.role != Role::Admin {
        return forbidden_response("Admin access required");
    }

    req.extensions_mut().insert(AdminContext {
        user_key: claims.sub,
    });
    next.run(req).await
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}

fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message,
        })),
    )
        .into_response()
}
