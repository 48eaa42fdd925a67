use axum::http::{header, StatusCode};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::cookie;

/// Standard error type for the mock API.
///
/// Every failure surfaces as a `{"message": "..."}` body with a fixed
/// status mapping — the shape the front end this mock stands in for
/// expects. Nothing is retried and no error is silently swallowed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Email or password is incorrect")]
    InvalidCredentials,

    #[error("Email is not verified")]
    NotVerified,

    #[error("Account is inactive")]
    InactiveAccount,

    /// Duplicate email on register / create / update.
    #[error("{0}")]
    Conflict(String),

    /// Missing or malformed required field, bad JSON, item quantity < 1.
    #[error("{0}")]
    Validation(String),

    /// Cross-entity rule violation: missing target department or employee,
    /// last-admin delete, non-empty department delete.
    #[error("{0}")]
    InvariantViolation(String),

    /// Unknown/expired verification or reset tokens, editing a non-pending
    /// request.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Expired access token. The response also clears the refresh cookie so
    /// the client stops presenting a credential it can no longer rotate.
    #[error("Access token has expired")]
    TokenExpired,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials
            | ApiError::NotVerified
            | ApiError::InactiveAccount
            | ApiError::Conflict(_)
            | ApiError::Validation(_)
            | ApiError::InvariantViolation(_)
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::TokenExpired => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body for API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        if let ApiError::Internal(ref msg) = self {
            tracing::error!("internal error: {msg}");
        }

        let body = axum::Json(ErrorBody {
            message: self.to_string(),
        });

        match self {
            ApiError::TokenExpired => (
                status,
                [(header::SET_COOKIE, cookie::clear_refresh_cookie())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::InvalidCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotVerified.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InactiveAccount.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Conflict("dup".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn expired_token_clears_refresh_cookie() {
        let res = ApiError::TokenExpired.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .expect("expired token response must clear the refresh cookie")
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("refreshToken=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn plain_errors_set_no_cookie() {
        let res = ApiError::Unauthorized("Missing Authorization header".into()).into_response();
        assert!(res.headers().get(header::SET_COOKIE).is_none());
    }
}
