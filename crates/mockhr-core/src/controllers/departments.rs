//! Department CRUD.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::extractors::{CurrentAccount, Json, PathId, RequireAdmin};
use crate::models::Department;

use super::{AppState, MessageResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list).post(create))
        .route(
            "/departments/{id}",
            get(get_by_id).put(update).delete(delete_department),
        )
}

pub async fn list(
    State(state): State<AppState>,
    CurrentAccount(_caller): CurrentAccount,
) -> Result<Json<Vec<Department>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.departments.clone()))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentAccount(_caller): CurrentAccount,
    PathId(id): PathId,
) -> Result<Json<Department>, ApiError> {
    let store = state.store.read().await;
    let department = store
        .department(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("Department not found".to_string()))?;
    Ok(Json(department))
}

/// Create a department. `employeeCount` is not client-settable; new
/// departments always start at 0.
#[utoipa::path(
    post,
    path = "/departments",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Created with employeeCount 0", body = Department),
        (status = 400, description = "Missing name", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "departments"
)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    Json(payload): Json<CreateDepartmentRequest>,
) -> Result<Response, ApiError> {
    if payload.name.is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }

    let mut store = state.store.write().await;
    let department = Department {
        id: store.next_department_id(),
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        employee_count: 0,
    };
    store.departments.push(department.clone());

    Ok((StatusCode::CREATED, Json(department)).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    PathId(id): PathId,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> Result<Json<Department>, ApiError> {
    let mut store = state.store.write().await;
    let department = store
        .department_mut(id)
        .ok_or_else(|| ApiError::NotFound("Department not found".to_string()))?;

    // Name and description only; the counter stays derived.
    if let Some(name) = payload.name {
        department.name = name;
    }
    if let Some(description) = payload.description {
        department.description = description;
    }

    Ok(Json(department.clone()))
}

pub async fn delete_department(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    PathId(id): PathId,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    let department = store
        .department(id)
        .ok_or_else(|| ApiError::NotFound("Department not found".to_string()))?;

    if department.employee_count > 0 {
        return Err(ApiError::InvariantViolation(
            "Cannot delete a department with assigned employees".to_string(),
        ));
    }

    store.departments.retain(|d| d.id != id);
    Ok(Json(MessageResponse::new("Department deleted")))
}
