//! Launch-offer API routes.
//!
//! Shoppers read their eligibility; the back office reads and updates the
//! offer configuration. The settings record is materialized with defaults on
//! first read and never deleted.

use axum::{
    extract::{Extension, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use domain::models::offer::{
    DiscountType, OfferSettings, OfferSettingsResponse, UpdateOfferSettingsRequest,
    LAUNCH_OFFER_NAME,
};
use domain::services::eligibility::{evaluate, Shopper};
use persistence::entities::DiscountTypeDb;
use persistence::repositories::{OfferSettingsRepository, OrderRepository};
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OptionalUserAuth;
use crate::middleware::AdminContext;

/// GET /api/v1/offers/launch/eligibility
///
/// Current launch-offer eligibility for the caller. Guests are evaluated
/// without an order count. This read path favors availability: if the
/// configuration store is unreachable the hardcoded launch defaults answer
/// instead, and the order count degrades to zero. Checkout never takes that
/// shortcut (see the checkout service).
pub async fn get_eligibility(
    State(state): State<AppState>,
    OptionalUserAuth(user): OptionalUserAuth,
) -> Result<impl IntoResponse, ApiError> {
    let settings_repo = OfferSettingsRepository::new(state.pool.clone());

    let settings = match settings_repo.get_or_create(LAUNCH_OFFER_NAME).await {
        Ok(entity) => OfferSettings::from(entity),
        Err(err) => {
            warn!(error = %err, "Offer settings unreachable; answering eligibility from defaults");
            OfferSettings::launch_defaults()
        }
    };

    let order_count = match &user {
        Some(auth) => {
            let order_repo = OrderRepository::new(state.pool.clone());
            match order_repo.count_by_user(&auth.user_key).await {
                Ok(count) => Some(count),
                Err(err) => {
                    warn!(error = %err, "Order count unreachable; treating caller as first-time");
                    Some(0)
                }
            }
        }
        None => None,
    };

    let shopper = match (&user, order_count) {
        (Some(auth), Some(count)) => Shopper::Customer {
            user_key: &auth.user_key,
            order_count: count,
        },
        _ => Shopper::Guest,
    };

    let result = evaluate(&settings, shopper, Utc::now());
    Ok(Json(result))
}

/// GET /api/v1/admin/offers/launch
///
/// Read the offer settings, materializing the default record on first read.
pub async fn get_offer_settings(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
) -> Result<impl IntoResponse, ApiError> {
    let settings_repo = OfferSettingsRepository::new(state.pool.clone());
    let entity = settings_repo.get_or_create(LAUNCH_OFFER_NAME).await?;

    info!(admin = %admin.user_key, "Fetched offer settings");

    Ok(Json(OfferSettingsResponse::from(OfferSettings::from(
        entity,
    ))))
}

/// PUT /api/v1/admin/offers/launch
///
/// Merge-update the offer settings. Absent fields keep their current values;
/// the record is upserted so a PUT before any read still works.
pub async fn update_offer_settings(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Json(request): Json<UpdateOfferSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let settings_repo = OfferSettingsRepository::new(state.pool.clone());

    // Get current settings to merge with updates
    let current = settings_repo.get_or_create(LAUNCH_OFFER_NAME).await?;

    let active = request.active.unwrap_or(current.active);
    let discount_type: DiscountType = request
        .discount_type
        .unwrap_or_else(|| current.discount_type.into());
    let discount_value = request.discount_value.unwrap_or(current.discount_value);
    let max_orders_per_user = request
        .max_orders_per_user
        .unwrap_or(current.max_orders_per_user);
    let min_order_value = request.min_order_value.unwrap_or(current.min_order_value);
    let valid_until = if request.clear_valid_until {
        None
    } else {
        request.valid_until.or(current.valid_until)
    };

    // Percent discounts above 100 would be clamped at quote time, but they
    // are always a configuration mistake; reject them at the door.
    if discount_type == DiscountType::Percent && discount_value > 100 {
        return Err(ApiError::validation(
            "Percent discount value cannot exceed 100",
        ));
    }

    let entity = settings_repo
        .upsert(
            LAUNCH_OFFER_NAME,
            active,
            DiscountTypeDb::from(discount_type),
            discount_value,
            max_orders_per_user,
            min_order_value,
            valid_until,
        )
        .await?;

    info!(
        admin = %admin.user_key,
        active,
        discount_value,
        max_orders_per_user,
        "Updated offer settings"
    );

    Ok(Json(OfferSettingsResponse::from(OfferSettings::from(
        entity,
    ))))
}
