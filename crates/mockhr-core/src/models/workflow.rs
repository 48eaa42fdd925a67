use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WorkflowStatus {
    Pending,
    ForReviewing,
    Approved,
    Rejected,
    Completed,
}

/// A unit of work assigned to an employee (onboarding task, transfer
/// record, request approval, ...).
///
/// Created by the transfer side effect or by explicit POST; the status
/// moves only via the explicit update operation. Listings sort by
/// `created` descending.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: u64,
    /// The employee who must action this workflow.
    pub employee_id: u64,
    /// Open set: "Onboarding", "Transfer", "RequestApproval", ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form structured payload.
    pub details: serde_json::Value,
    pub status: WorkflowStatus,
    pub created: DateTime<Utc>,
}
