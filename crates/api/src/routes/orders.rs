//! Order API routes.
//!
//! Checkout, order retrieval for shoppers, and the payment-status relay the
//! gateway integration calls after it has verified the gateway's signature.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::models::order::{OrderResponse, PaymentStatus, UpdatePaymentStatusRequest};
use domain::models::CreateOrderRequest;
use persistence::entities::PaymentStatusDb;
use persistence::repositories::{IdempotencyRepository, OrderRepository};
use serde::{Deserialize, Serialize};
use shared::crypto::digests_match;
use shared::pagination::{decode_cursor, encode_cursor};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{OptionalIdempotencyKey, OptionalUserAuth, UserAuth};
use crate::middleware::metrics::record_payment_transition;
use crate::services::checkout;

/// Header the payment relay authenticates with.
pub const GATEWAY_TOKEN_HEADER: &str = "x-gateway-token";

/// Default and maximum page sizes for order listings.
const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// POST /api/v1/orders
///
/// Checkout. Guests may order; identified shoppers have their prior-order
/// count held against the launch-offer cap. With an `Idempotency-Key` header
/// a retried submission replays the stored response instead of creating a
/// second order; without one every call creates a new order.
pub async fn create_order(
    State(state): State<AppState>,
    OptionalUserAuth(user): OptionalUserAuth,
    OptionalIdempotencyKey(idempotency): OptionalIdempotencyKey,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Response, ApiError> {
    // Keys are scoped to the caller so one shopper's key cannot replay
    // another's order. Guests scope to the key hash itself.
    let scope = |key_hash: &str| {
        user.as_ref()
            .map(|auth| auth.user_key.clone())
            .unwrap_or_else(|| key_hash.to_string())
    };

    if let Some(key) = &idempotency {
        let idem_repo = IdempotencyRepository::new(state.pool.clone());
        if let Some(stored) = idem_repo.find_valid(&key.hash, &scope(&key.hash)).await? {
            info!("Replaying stored checkout response for idempotency key");
            let status = StatusCode::from_u16(stored.response_status as u16)
                .unwrap_or(StatusCode::CREATED);
            return Ok((status, Json(stored.response_body)).into_response());
        }
    }

    let response = checkout::place_order(&state, user.as_ref(), request).await?;

    if let Some(key) = &idempotency {
        let idem_repo = IdempotencyRepository::new(state.pool.clone());
        let snapshot = serde_json::to_value(&response)?;
        if let Err(err) = idem_repo
            .store(
                &key.hash,
                &scope(&key.hash),
                StatusCode::CREATED.as_u16() as i16,
                snapshot,
            )
            .await
        {
            // The order exists; a lost snapshot only costs replay protection.
            warn!(error = %err, "Failed to store idempotency snapshot");
        }
    }

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// GET /api/v1/orders/:order_id
///
/// A shopper sees their own orders; admins see any. Orders belonging to
/// someone else read as not-found rather than forbidden.
pub async fn get_order(
    State(state): State<AppState>,
    user: UserAuth,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order_repo = OrderRepository::new(state.pool.clone());

    let entity = order_repo
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    let is_owner = entity.user_id.as_deref() == Some(user.user_key.as_str());
    if !is_owner && !user.is_admin() {
        return Err(ApiError::NotFound("Order not found".to_string()));
    }

    Ok(Json(OrderResponse::from(entity.into_domain()?)))
}

/// Query parameters for order listings.
#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// Response for order listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// GET /api/v1/orders
///
/// The caller's orders, newest first, cursor-paginated.
pub async fn list_orders(
    State(state): State<AppState>,
    user: UserAuth,
    Query(params): Query<ListOrdersParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let cursor = params
        .cursor
        .as_deref()
        .map(decode_cursor)
        .transpose()
        .map_err(|_| ApiError::validation("Invalid cursor"))?;

    let order_repo = OrderRepository::new(state.pool.clone());
    let entities = order_repo
        .list_by_user(&user.user_key, cursor, limit)
        .await?;

    let next_cursor = if entities.len() as i64 == limit {
        entities
            .last()
            .map(|last| encode_cursor(last.created_at, last.id))
    } else {
        None
    };

    let orders = entities
        .into_iter()
        .map(|entity| entity.into_domain().map(OrderResponse::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(OrderListResponse {
        orders,
        next_cursor,
    }))
}

/// POST /api/v1/orders/:order_id/payment
///
/// Payment-status relay. The caller (our gateway webhook integration) has
/// already verified the gateway signature; this endpoint authenticates the
/// relay itself and transitions `payment_status` only. Amount fields are
/// immutable once the order exists.
pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = headers
        .get(GATEWAY_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing gateway token".to_string()))?;

    if !digests_match(token, &state.config.gateway.callback_token) {
        return Err(ApiError::Unauthorized("Invalid gateway token".to_string()));
    }

    request.validate()?;

    if request.payment_status == PaymentStatus::Pending {
        return Err(ApiError::validation(
            "Payment status can only transition to completed or failed",
        ));
    }

    let order_repo = OrderRepository::new(state.pool.clone());

    let current = order_repo
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    if current.payment_status != PaymentStatusDb::Pending {
        return Err(ApiError::Conflict("Payment already settled".to_string()));
    }

    let updated = order_repo
        .update_payment_status(
            order_id,
            &request.gateway_order_id,
            request.payment_status.into(),
        )
        .await?
        // Lost a race with another callback between the read and the update
        .ok_or_else(|| ApiError::Conflict("Payment already settled".to_string()))?;

    record_payment_transition(&request.payment_status.to_string());
    info!(
        order_id = %order_id,
        payment_status = %request.payment_status,
        "Payment status updated"
    );

    Ok(Json(OrderResponse::from(updated.into_domain()?)))
}
