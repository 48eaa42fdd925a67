//! Workflow handlers.
//!
//! Listings are sorted by creation timestamp descending. Status moves only
//! via the explicit update operation: an admin may update any workflow, a
//! non-admin only workflows assigned to their own linked employee.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::extractors::{CurrentAccount, Json, PathId, RequireAdmin};
use crate::models::{Workflow, WorkflowStatus};

use super::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowRequest {
    pub employee_id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<WorkflowStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateWorkflowRequest {
    pub status: WorkflowStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workflows", get(list).post(create))
        .route("/workflows/employee/{id}", get(list_by_employee))
        .route("/workflows/{id}", put(update_status))
}

fn sorted_desc(mut workflows: Vec<Workflow>) -> Vec<Workflow> {
    workflows.sort_by(|a, b| b.created.cmp(&a.created));
    workflows
}

/// List all workflows (admin only), newest first.
#[utoipa::path(
    get,
    path = "/workflows",
    responses(
        (status = 200, description = "All workflows, created descending", body = [Workflow]),
        (status = 403, description = "Not an admin", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "workflows"
)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
) -> Result<Json<Vec<Workflow>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(sorted_desc(store.workflows.clone())))
}

pub async fn list_by_employee(
    State(state): State<AppState>,
    CurrentAccount(_caller): CurrentAccount,
    PathId(employee_id): PathId,
) -> Result<Json<Vec<Workflow>>, ApiError> {
    let store = state.store.read().await;
    let workflows = store
        .workflows
        .iter()
        .filter(|w| w.employee_id == employee_id)
        .cloned()
        .collect();
    Ok(Json(sorted_desc(workflows)))
}

pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    Json(payload): Json<CreateWorkflowRequest>,
) -> Result<Response, ApiError> {
    let mut store = state.store.write().await;

    if store.employee(payload.employee_id).is_none() {
        return Err(ApiError::InvariantViolation(
            "Target employee not found".to_string(),
        ));
    }

    let workflow = Workflow {
        id: store.next_workflow_id(),
        employee_id: payload.employee_id,
        kind: payload.kind,
        details: payload.details.unwrap_or(serde_json::Value::Null),
        status: payload.status.unwrap_or(WorkflowStatus::Pending),
        created: Utc::now(),
    };
    store.workflows.push(workflow.clone());

    Ok((StatusCode::CREATED, Json(workflow)).into_response())
}

pub async fn update_status(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathId(id): PathId,
    Json(payload): Json<UpdateWorkflowRequest>,
) -> Result<Json<Workflow>, ApiError> {
    let mut store = state.store.write().await;

    let Some(idx) = store.workflows.iter().position(|w| w.id == id) else {
        return Err(ApiError::NotFound("Workflow not found".to_string()));
    };

    if !caller.is_admin() {
        let assigned_to_caller =
            store.linked_employee_id(&caller) == Some(store.workflows[idx].employee_id);
        if !assigned_to_caller {
            return Err(ApiError::Forbidden(
                "You do not have permission to access this resource".to_string(),
            ));
        }
    }

    store.workflows[idx].status = payload.status;
    Ok(Json(store.workflows[idx].clone()))
}
