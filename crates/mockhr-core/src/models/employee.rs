use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee record.
///
/// `department_id` must always reference an existing department; any change
/// to it keeps `Department::employee_count` consistent under the store lock.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: u64,
    /// Display code, e.g. "EMP001". Wire name `employeeId` (the front end's
    /// historical naming; distinct from the numeric `id`).
    #[serde(rename = "employeeId")]
    pub employee_code: String,
    /// Linked account id.
    pub user_id: u64,
    pub position: String,
    pub department_id: u64,
    pub hire_date: NaiveDate,
    pub status: String,
}
