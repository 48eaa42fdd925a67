use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::account::{Account, Role};

/// JWT claims payload for access tokens.
///
/// Wire format is the standard three dot-separated base64url segments.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Claims {
    /// Account ID
    pub id: u64,
    /// Account role at issuance
    pub role: Role,
    /// Account email at issuance
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// Create a signed access token for an account.
pub fn create_token(account: &Account, secret: &str, ttl_mins: u64) -> Result<String, ApiError> {
    let now = Utc::now();
    let expires = now + Duration::minutes(ttl_mins as i64);

    let claims = Claims {
        id: account.id,
        role: account.role,
        email: account.email.clone(),
        iat: now.timestamp() as usize,
        exp: expires.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to create token: {}", e)))
}

/// Validate an access token and return the claims.
///
/// Fails closed: an expired token maps to [`ApiError::TokenExpired`] (which
/// also clears the refresh cookie on the response) and every other decode
/// failure maps to a generic 401. No parse error escapes this boundary.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ApiError::TokenExpired,
        _ => ApiError::Unauthorized("Invalid access token".to_string()),
    })
}
