//! Shared utilities and common types for the FrameKart backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Bearer-token verification against the external identity provider
//! - Cryptographic digest utilities
//! - Common validation logic for checkout payloads
//! - Cursor-based pagination helpers

pub mod auth;
pub mod crypto;
pub mod pagination;
pub mod validation;
