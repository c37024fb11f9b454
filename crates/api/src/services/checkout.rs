//! Order creation service.
//!
//! This is the only writer of order amount fields. The flow is: validate the
//! payload, recompute the subtotal from line items, fetch the offer settings
//! (hard failure if unreachable: a defaulted discount must never be charged),
//! evaluate eligibility against the caller's prior-order count, quote the
//! total, and persist. Client-submitted totals are compared for telemetry and
//! then discarded.

use chrono::Utc;
use domain::models::offer::{OfferSettings, LAUNCH_OFFER_NAME};
use domain::models::order::{CreateOrderRequest, OrderResponse};
use domain::services::eligibility::{evaluate, Shopper};
use domain::services::pricing::{quote, subtotal_of};
use persistence::repositories::orders::NewOrder;
use persistence::repositories::{OfferSettingsRepository, OrderRepository};
use tracing::{error, info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_discount_applied, record_order_created};

/// Places one order and returns the created record.
///
/// Exactly one order row is created per successful call; the offer settings
/// are never written here.
pub async fn place_order(
    state: &AppState,
    user: Option<&UserAuth>,
    request: CreateOrderRequest,
) -> Result<OrderResponse, ApiError> {
    request.validate()?;

    let subtotal = subtotal_of(&request.items);

    if let Some(client_subtotal) = request.subtotal {
        if client_subtotal != subtotal {
            warn!(
                client_subtotal,
                server_subtotal = subtotal,
                "Client-submitted subtotal differs from server computation; ignoring it"
            );
        }
    }

    // A settings failure here is a hard 503. Quoting from fallback defaults
    // could charge a discount the configuration no longer grants.
    let settings_repo = OfferSettingsRepository::new(state.pool.clone());
    let settings = settings_repo
        .get_or_create(LAUNCH_OFFER_NAME)
        .await
        .map(OfferSettings::from)
        .map_err(|err| {
            error!(error = %err, "Offer settings unreachable during checkout");
            ApiError::ServiceUnavailable("Offer configuration is unavailable".to_string())
        })?;

    let order_repo = OrderRepository::new(state.pool.clone());

    let shopper = match user {
        Some(auth) => Shopper::Customer {
            user_key: &auth.user_key,
            order_count: order_repo.count_by_user(&auth.user_key).await?,
        },
        None => Shopper::Guest,
    };

    let eligibility = evaluate(&settings, shopper, Utc::now());
    let pricing = quote(subtotal, &settings, &eligibility);

    if let Some(client_discount) = request.discount {
        if client_discount != pricing.discount {
            warn!(
                client_discount,
                server_discount = pricing.discount,
                "Client-submitted discount differs from server computation; ignoring it"
            );
        }
    }

    // Persist the discount column only when the offer actually applied.
    let discount = (eligibility.eligible && pricing.discount > 0).then_some(pricing.discount);

    let entity = order_repo
        .create(NewOrder {
            user_id: user.map(|auth| auth.user_key.clone()),
            customer_email: request.customer_email.clone(),
            items: serde_json::to_value(&request.items)?,
            address: serde_json::to_value(&request.address)?,
            subtotal: pricing.subtotal,
            discount,
            shipping: pricing.shipping,
            total_amount: pricing.total,
        })
        .await?;

    let order = entity.into_domain()?;

    record_order_created(user.is_none());
    if let Some(amount) = discount {
        record_discount_applied(amount);
    }

    info!(
        order_id = %order.id,
        subtotal = order.subtotal,
        discount = order.discount.unwrap_or(0),
        total_amount = order.total_amount,
        guest = user.is_none(),
        "Order created"
    );

    Ok(OrderResponse::from(order))
}
