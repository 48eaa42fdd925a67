use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Department record.
///
/// `employee_count` is a derived counter, never negative and never
/// client-settable: it always equals the number of employees whose
/// `department_id` points here. A department with a non-zero count cannot
/// be deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub employee_count: u32,
}
