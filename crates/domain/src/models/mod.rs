//! Domain models for FrameKart.

pub mod offer;
pub mod order;

pub use offer::{DiscountType, OfferSettings, OfferSettingsResponse, UpdateOfferSettingsRequest};
pub use order::{
    CreateOrderRequest, Order, OrderItem, OrderResponse, PaymentStatus, ShippingAddress,
    UpdatePaymentStatusRequest,
};
