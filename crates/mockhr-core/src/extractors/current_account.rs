use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth;
use crate::controllers::AppState;
use crate::error::ApiError;
use crate::models::Account;

/// Extractor that validates the bearer token and resolves the caller.
///
/// Usage in handlers:
/// ```rust,ignore
/// async fn my_handler(CurrentAccount(caller): CurrentAccount) -> impl IntoResponse {
///     // caller is the authenticated Account
/// }
/// ```
///
/// Fails closed: missing header, wrong shape, bad signature or an unknown
/// account id all reject with 401. An expired token rejects with 401 and
/// clears the refresh cookie (see [`ApiError::TokenExpired`]).
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // HeaderMap lookup is case-insensitive by construction.
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = auth::decode_token(token, &state.config.jwt_secret)?;

        let store = state.store.read().await;
        let account = store
            .account(claims.id)
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Unknown account".to_string()))?;

        Ok(CurrentAccount(account))
    }
}

/// Extractor that additionally requires the `Admin` role.
///
/// Usage in handlers:
/// ```rust,ignore
/// async fn admin_handler(RequireAdmin(caller): RequireAdmin) -> impl IntoResponse {
///     // caller.role is guaranteed Admin
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Account);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentAccount(account) = CurrentAccount::from_request_parts(parts, state).await?;
        if !account.is_admin() {
            return Err(ApiError::Forbidden(
                "You do not have permission to access this resource".to_string(),
            ));
        }
        Ok(RequireAdmin(account))
    }
}
