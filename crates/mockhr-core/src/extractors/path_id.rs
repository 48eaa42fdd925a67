use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::controllers::AppState;
use crate::error::ApiError;

/// Numeric-id path segment.
///
/// A non-numeric id is treated as a route that does not exist: rejection
/// is the same 404 (naming the method and path) that an unmatched route
/// produces, not a 400.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub u64);

impl FromRequestParts<AppState> for PathId {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let not_found = |parts: &Parts| {
            ApiError::NotFound(format!(
                "Route not found for {} {}",
                parts.method,
                parts.uri.path()
            ))
        };

        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found(parts))?;

        raw.parse::<u64>().map(PathId).map_err(|_| not_found(parts))
    }
}
