use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One line item of an [`AppRequest`]. Quantity is validated to be ≥ 1 at
/// the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestItem {
    pub name: String,
    pub quantity: u32,
}

/// An employee-initiated request (equipment, leave, ...).
///
/// Visibility is restricted to the owning employee's linked account or an
/// admin. Named `AppRequest` to keep it apart from the HTTP request types.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppRequest {
    pub id: u64,
    /// The requesting employee.
    pub employee_id: u64,
    /// e.g. "Equipment"
    #[serde(rename = "type")]
    pub kind: String,
    /// Ordered, non-empty list of line items.
    pub request_items: Vec<RequestItem>,
    /// Starts "Pending".
    pub status: String,
    pub created: DateTime<Utc>,
}
