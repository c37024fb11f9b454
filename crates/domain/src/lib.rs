//! Domain layer for the FrameKart backend.
//!
//! This crate contains:
//! - Domain models (offer settings, orders, shipping addresses)
//! - The pricing and eligibility business logic
//! - Request/response types with validation rules

pub mod models;
pub mod services;
