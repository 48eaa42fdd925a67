//! Domain entities and their public wire projections.
//!
//! Wire format is camelCase JSON throughout — the shape the HR front end
//! consumes. Internal records that carry secrets (`Account`) are never
//! serialized in full on the wire; they get explicit response projections.

pub mod account;
pub mod department;
pub mod employee;
pub mod request;
pub mod workflow;

pub use account::{Account, AccountResponse, AccountStatus, AuthResponse, Role};
pub use department::Department;
pub use employee::Employee;
pub use request::{AppRequest, RequestItem};
pub use workflow::{Workflow, WorkflowStatus};
