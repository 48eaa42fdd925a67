//! Employee CRUD plus the transfer operation.
//!
//! Every department change (create, update, delete, transfer) keeps
//! `Department::employee_count` consistent in the same locked sequence,
//! and rejects the whole operation before mutating anything when the
//! target department does not exist.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::extractors::{CurrentAccount, Json, PathId, RequireAdmin};
use crate::models::{Employee, Workflow, WorkflowStatus};

use super::{AppState, MessageResponse};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    /// Display code, e.g. "EMP003".
    #[serde(rename = "employeeId")]
    pub employee_code: String,
    pub user_id: u64,
    pub position: String,
    pub department_id: u64,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(rename = "employeeId")]
    pub employee_code: Option<String>,
    pub user_id: Option<u64>,
    pub position: Option<String>,
    pub department_id: Option<u64>,
    pub hire_date: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub department_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransferResponse {
    pub message: String,
    pub employee: Employee,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list).post(create))
        .route("/employees/{id}", get(get_by_id).put(update).delete(delete_employee))
        .route("/employees/{id}/transfer", post(transfer))
}

pub async fn list(
    State(state): State<AppState>,
    CurrentAccount(_caller): CurrentAccount,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.employees.clone()))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentAccount(_caller): CurrentAccount,
    PathId(id): PathId,
) -> Result<Json<Employee>, ApiError> {
    let store = state.store.read().await;
    let employee = store
        .employee(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;
    Ok(Json(employee))
}

#[utoipa::path(
    post,
    path = "/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Created; department counter incremented", body = Employee),
        (status = 400, description = "Target department not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<Response, ApiError> {
    let mut store = state.store.write().await;

    if store.department(payload.department_id).is_none() {
        return Err(ApiError::InvariantViolation(
            "Target department not found".to_string(),
        ));
    }

    let employee = Employee {
        id: store.next_employee_id(),
        employee_code: payload.employee_code,
        user_id: payload.user_id,
        position: payload.position,
        department_id: payload.department_id,
        hire_date: payload.hire_date,
        status: payload.status.unwrap_or_else(|| "Active".to_string()),
    };
    if let Some(dept) = store.department_mut(employee.department_id) {
        dept.employee_count += 1;
    }
    store.employees.push(employee.clone());

    Ok((StatusCode::CREATED, Json(employee)).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    PathId(id): PathId,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<Employee>, ApiError> {
    let mut store = state.store.write().await;

    let Some(idx) = store.employees.iter().position(|e| e.id == id) else {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    };

    // Validate the department move before touching anything.
    let old_department = store.employees[idx].department_id;
    if let Some(new_department) = payload.department_id {
        if new_department != old_department && store.department(new_department).is_none() {
            return Err(ApiError::InvariantViolation(
                "Target department not found".to_string(),
            ));
        }
    }

    if let Some(new_department) = payload.department_id {
        store.shift_department_counts(old_department, new_department);
    }

    let employee = &mut store.employees[idx];
    if let Some(code) = payload.employee_code {
        employee.employee_code = code;
    }
    if let Some(user_id) = payload.user_id {
        employee.user_id = user_id;
    }
    if let Some(position) = payload.position {
        employee.position = position;
    }
    if let Some(department_id) = payload.department_id {
        employee.department_id = department_id;
    }
    if let Some(hire_date) = payload.hire_date {
        employee.hire_date = hire_date;
    }
    if let Some(status) = payload.status {
        employee.status = status;
    }

    Ok(Json(employee.clone()))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    PathId(id): PathId,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;

    let Some(idx) = store.employees.iter().position(|e| e.id == id) else {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    };

    let department_id = store.employees[idx].department_id;
    store.employees.remove(idx);
    if let Some(dept) = store.department_mut(department_id) {
        dept.employee_count = dept.employee_count.saturating_sub(1);
    }

    Ok(Json(MessageResponse::new("Employee deleted")))
}

/// Move an employee to another department.
///
/// The one handler with a side effect beyond its own resource: after
/// fixing both department counters it appends a Pending "Transfer"
/// workflow carrying the transfer payload. A transfer to the current
/// department still records the workflow.
#[utoipa::path(
    post,
    path = "/employees/{id}/transfer",
    params(("id" = u64, Path, description = "Employee id")),
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transferred; workflow appended", body = TransferResponse),
        (status = 400, description = "Target department not found", body = crate::error::ErrorBody),
        (status = 404, description = "No such employee", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn transfer(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    PathId(id): PathId,
    Json(payload): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    let mut store = state.store.write().await;

    let Some(idx) = store.employees.iter().position(|e| e.id == id) else {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    };
    if store.department(payload.department_id).is_none() {
        return Err(ApiError::InvariantViolation(
            "Target department not found".to_string(),
        ));
    }

    let old_department = store.employees[idx].department_id;
    store.shift_department_counts(old_department, payload.department_id);
    store.employees[idx].department_id = payload.department_id;
    let employee = store.employees[idx].clone();

    let details = serde_json::to_value(&payload)
        .map_err(|e| ApiError::Internal(format!("Failed to encode transfer details: {}", e)))?;
    let workflow = Workflow {
        id: store.next_workflow_id(),
        employee_id: id,
        kind: "Transfer".to_string(),
        details,
        status: WorkflowStatus::Pending,
        created: chrono::Utc::now(),
    };
    store.workflows.push(workflow);

    Ok(Json(TransferResponse {
        message: "Employee transferred successfully".to_string(),
        employee,
    }))
}
