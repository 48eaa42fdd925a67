//! Employee request handlers.
//!
//! Visibility is owner-or-admin throughout. A non-admin's requests are
//! always bound to their own linked employee — the client-supplied
//! employee id is ignored.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::extractors::{CurrentAccount, Json, PathId};
use crate::models::account::Account;
use crate::models::{AppRequest, RequestItem};
use crate::store::Store;

use super::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub request_items: Vec<RequestItem>,
    /// Target employee; only honored for admin callers.
    #[serde(default)]
    pub employee_id: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub request_items: Option<Vec<RequestItem>>,
    /// Admin only; owners may not touch the status.
    pub status: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/requests", get(list).post(create))
        .route("/requests/{id}", get(get_by_id).put(update))
}

fn validate_items(items: &[RequestItem]) -> Result<(), ApiError> {
    if items.is_empty() {
        return Err(ApiError::Validation("Request items are required".to_string()));
    }
    if items.iter().any(|item| item.quantity < 1) {
        return Err(ApiError::Validation(
            "Item quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn owns_request(store: &Store, caller: &Account, request: &AppRequest) -> bool {
    store.linked_employee_id(caller) == Some(request.employee_id)
}

/// List requests: admins see all, a non-admin only their own employee's.
#[utoipa::path(
    get,
    path = "/requests",
    responses(
        (status = 200, description = "Visible requests", body = [AppRequest]),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn list(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
) -> Result<Json<Vec<AppRequest>>, ApiError> {
    let store = state.store.read().await;
    let requests = if caller.is_admin() {
        store.requests.clone()
    } else {
        match store.linked_employee_id(&caller) {
            Some(employee_id) => store
                .requests
                .iter()
                .filter(|r| r.employee_id == employee_id)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    };
    Ok(Json(requests))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathId(id): PathId,
) -> Result<Json<AppRequest>, ApiError> {
    let store = state.store.read().await;
    let request = store
        .requests
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    if !caller.is_admin() && !owns_request(&store, &caller, request) {
        return Err(ApiError::Forbidden(
            "You do not have permission to access this resource".to_string(),
        ));
    }
    Ok(Json(request.clone()))
}

/// Create a request.
///
/// Non-admin callers are bound to their own linked employee; an admin may
/// create on behalf of any existing employee (defaulting to their own).
#[utoipa::path(
    post,
    path = "/requests",
    request_body = CreateAppRequest,
    responses(
        (status = 201, description = "Created with status Pending", body = AppRequest),
        (status = 400, description = "Bad items or missing employee", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn create(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    Json(payload): Json<CreateAppRequest>,
) -> Result<Response, ApiError> {
    validate_items(&payload.request_items)?;

    let mut store = state.store.write().await;

    let employee_id = if caller.is_admin() {
        match payload.employee_id {
            Some(id) => {
                if store.employee(id).is_none() {
                    return Err(ApiError::InvariantViolation(
                        "Target employee not found".to_string(),
                    ));
                }
                id
            }
            None => store.linked_employee_id(&caller).ok_or_else(|| {
                ApiError::Validation("No employee is linked to this account".to_string())
            })?,
        }
    } else {
        // Client-supplied employee id is ignored for non-admins.
        store.linked_employee_id(&caller).ok_or_else(|| {
            ApiError::Validation("No employee is linked to this account".to_string())
        })?
    };

    let request = AppRequest {
        id: store.next_request_id(),
        employee_id,
        kind: payload.kind,
        request_items: payload.request_items,
        status: "Pending".to_string(),
        created: Utc::now(),
    };
    store.requests.push(request.clone());

    Ok((StatusCode::CREATED, Json(request)).into_response())
}

/// Update a request.
///
/// Admins may change type, items and status. The owner may edit type and
/// items while the request is still Pending, and may never touch the
/// status.
pub async fn update(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathId(id): PathId,
    Json(payload): Json<UpdateAppRequest>,
) -> Result<Json<AppRequest>, ApiError> {
    if let Some(ref items) = payload.request_items {
        validate_items(items)?;
    }

    let mut store = state.store.write().await;

    let Some(idx) = store.requests.iter().position(|r| r.id == id) else {
        return Err(ApiError::NotFound("Request not found".to_string()));
    };

    if !caller.is_admin() {
        if !owns_request(&store, &caller, &store.requests[idx]) {
            return Err(ApiError::Forbidden(
                "You do not have permission to access this resource".to_string(),
            ));
        }
        if payload.status.is_some() {
            return Err(ApiError::Forbidden(
                "You are not allowed to change the request status".to_string(),
            ));
        }
        if store.requests[idx].status != "Pending" {
            return Err(ApiError::BadRequest(
                "Only pending requests can be edited".to_string(),
            ));
        }
    }

    let request = &mut store.requests[idx];
    if let Some(kind) = payload.kind {
        request.kind = kind;
    }
    if let Some(items) = payload.request_items {
        request.request_items = items;
    }
    if let Some(status) = payload.status {
        request.status = status;
    }

    Ok(Json(request.clone()))
}
