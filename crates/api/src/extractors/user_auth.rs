//! Shopper authentication extractors.
//!
//! Tokens come from the external identity provider; these extractors only
//! verify the bearer token and surface its subject and role.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::auth::Role;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller information from a verified bearer token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// Stable user key from the token's subject claim.
    pub user_key: String,
    /// Caller role for back-office authorization.
    pub role: Role,
}

impl UserAuth {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state
            .verifier
            .verify(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(UserAuth {
            user_key: claims.sub,
            role: claims.role,
        })
    }
}

/// Optional shopper authentication.
///
/// Guest checkout and guest eligibility checks are legitimate flows, so
/// routes using this extractor accept unauthenticated requests. A present
/// but invalid token is still rejected rather than silently downgraded to a
/// guest: a shopper with an expired session should see an auth error, not a
/// cart that quietly loses its discount history.
#[derive(Debug, Clone)]
pub struct OptionalUserAuth(pub Option<UserAuth>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok());

        match auth_header {
            None => Ok(OptionalUserAuth(None)),
            Some(_) => {
                let auth = UserAuth::from_request_parts(parts, state).await?;
                Ok(OptionalUserAuth(Some(auth)))
            }
        }
    }
}
