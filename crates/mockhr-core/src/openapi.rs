use utoipa::OpenApi;

use crate::controllers::accounts::{
    AuthenticateRequest, CreateAccountRequest, ForgotPasswordRequest, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest, RevokeTokenRequest, UpdateAccountRequest,
    ValidateResetTokenRequest, VerifyEmailRequest,
};
use crate::controllers::employees::{CreateEmployeeRequest, TransferRequest, TransferResponse};
use crate::controllers::departments::CreateDepartmentRequest;
use crate::controllers::requests::CreateAppRequest;
use crate::controllers::MessageResponse;
use crate::error::ErrorBody;
use crate::models::{
    account::{AccountResponse, AccountStatus, AuthResponse, Role},
    AppRequest, Department, Employee, RequestItem, Workflow, WorkflowStatus,
};

/// Generated OpenAPI documentation, served with the Scalar UI at
/// `/api-docs` (spec at `/api-docs/openapi.json`).
#[derive(OpenApi)]
#[openapi(
    info(
        title = "mockhr API",
        version = "0.1.0",
        description = "Mock HR-management REST API: accounts, employees, departments, workflows, requests."
    ),
    paths(
        crate::controllers::accounts::authenticate,
        crate::controllers::accounts::refresh_token,
        crate::controllers::accounts::revoke_token,
        crate::controllers::accounts::register,
        crate::controllers::accounts::verify_email,
        crate::controllers::accounts::forgot_password,
        crate::controllers::accounts::validate_reset_token,
        crate::controllers::accounts::reset_password,
        crate::controllers::accounts::list,
        crate::controllers::accounts::create,
        crate::controllers::accounts::get_by_id,
        crate::controllers::accounts::update,
        crate::controllers::accounts::delete_account,
        crate::controllers::employees::create,
        crate::controllers::employees::transfer,
        crate::controllers::departments::create,
        crate::controllers::workflows::list,
        crate::controllers::requests::list,
        crate::controllers::requests::create,
    ),
    components(
        schemas(
            AuthenticateRequest,
            RefreshTokenRequest,
            RevokeTokenRequest,
            RegisterRequest,
            VerifyEmailRequest,
            ForgotPasswordRequest,
            ValidateResetTokenRequest,
            ResetPasswordRequest,
            CreateAccountRequest,
            UpdateAccountRequest,
            CreateEmployeeRequest,
            TransferRequest,
            TransferResponse,
            CreateDepartmentRequest,
            CreateAppRequest,
            AccountResponse,
            AuthResponse,
            Role,
            AccountStatus,
            WorkflowStatus,
            MessageResponse,
            ErrorBody,
            Employee,
            Department,
            Workflow,
            AppRequest,
            RequestItem,
        )
    ),
    tags(
        (name = "accounts", description = "Authentication, credential lifecycle and account CRUD"),
        (name = "employees", description = "Employee CRUD and transfer"),
        (name = "departments", description = "Department CRUD"),
        (name = "workflows", description = "Workflow listing and status updates"),
        (name = "requests", description = "Employee requests")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add the JWT Bearer security scheme to the OpenAPI spec.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}
