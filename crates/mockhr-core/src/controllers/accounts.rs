//! Account lifecycle and credential handlers.
//!
//! State machine: `Unregistered → PendingVerification → Active ⇄ Inactive
//! → Deleted` (the first-ever account and admin-created accounts skip
//! `PendingVerification`).

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::{self, cookie};
use crate::error::ApiError;
use crate::extractors::{CurrentAccount, Json, PathId, RequireAdmin};
use crate::models::account::{Account, AccountResponse, AccountStatus, AuthResponse, Role};
use crate::notify::Notice;

use super::{AppState, MessageResponse};

// ── Request types ──

#[derive(Debug, Deserialize, ToSchema)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    /// Refresh credential; falls back to the `refreshToken` cookie when
    /// absent.
    pub refresh_token: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RevokeTokenRequest {
    /// Credential to revoke; falls back to the `refreshToken` cookie when
    /// absent.
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateResetTokenRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub employee_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Empty or absent leaves the current password untouched.
    pub password: Option<String>,
    pub role: Option<Role>,
    pub employee_id: Option<u64>,
    pub status: Option<AccountStatus>,
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/authenticate", post(authenticate))
        .route("/accounts/refresh-token", post(refresh_token))
        .route("/accounts/revoke-token", post(revoke_token))
        .route("/accounts/register", post(register))
        .route("/accounts/verify-email", post(verify_email))
        .route("/accounts/forgot-password", post(forgot_password))
        .route("/accounts/validate-reset-token", post(validate_reset_token))
        .route("/accounts/reset-password", post(reset_password))
        .route("/accounts", get(list).post(create))
        .route("/accounts/{id}", get(get_by_id).put(update).delete(delete_account))
}

// ── Helpers ──

fn mint_auth_response(
    state: &AppState,
    account: &Account,
    refresh: &str,
) -> Result<Response, ApiError> {
    let jwt = auth::create_token(account, &state.config.jwt_secret, state.config.access_token_ttl_mins)?;
    Ok((
        [(
            header::SET_COOKIE,
            cookie::refresh_cookie(refresh, state.config.refresh_token_ttl_days),
        )],
        Json(AuthResponse::new(account, jwt)),
    )
        .into_response())
}

/// Parse an optional JSON body. An empty body is fine (the credential may
/// arrive via cookie instead); malformed JSON fails closed to "absent".
fn optional_body<T: serde::de::DeserializeOwned + Default>(bytes: &[u8]) -> T {
    if bytes.is_empty() {
        T::default()
    } else {
        serde_json::from_slice(bytes).unwrap_or_default()
    }
}

// ── Handlers ──

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/accounts/authenticate",
    request_body = AuthenticateRequest,
    responses(
        (status = 200, description = "Authenticated; refresh credential set as cookie", body = AuthResponse),
        (status = 400, description = "Wrong credentials, unverified or inactive account", body = crate::error::ErrorBody)
    ),
    tag = "accounts"
)]
pub async fn authenticate(
    State(state): State<AppState>,
    Json(payload): Json<AuthenticateRequest>,
) -> Result<Response, ApiError> {
    let mut store = state.store.write().await;

    let Some(idx) = store.accounts.iter().position(|a| a.email == payload.email) else {
        return Err(ApiError::InvalidCredentials);
    };
    if !auth::verify_password(&payload.password, &store.accounts[idx].password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let account = &store.accounts[idx];
    if !account.is_verified {
        // Resend the verification notice out of band, off the request path.
        let outbox = state.outbox.clone();
        let email = account.email.clone();
        let token = account.verification_token.clone();
        tokio::spawn(async move {
            outbox.record(Notice::ResendVerification { email, token });
        });
        return Err(ApiError::NotVerified);
    }
    if account.status != AccountStatus::Active {
        return Err(ApiError::InactiveAccount);
    }

    let refresh = auth::generate_secure_token();
    store.accounts[idx].refresh_tokens.push(refresh.clone());
    store.persist_accounts()?;
    let account = store.accounts[idx].clone();
    drop(store);

    mint_auth_response(&state, &account, &refresh)
}

/// Rotate a refresh credential: one-token-one-use.
#[utoipa::path(
    post,
    path = "/accounts/refresh-token",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token and rotated refresh cookie", body = AuthResponse),
        (status = 401, description = "Missing, unknown or already-consumed credential", body = crate::error::ErrorBody)
    ),
    tag = "accounts"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Response, ApiError> {
    let payload: RefreshTokenRequest = optional_body(&body);
    // Body takes precedence over the cookie side channel.
    let supplied = payload
        .refresh_token
        .filter(|t| !t.is_empty())
        .or_else(|| cookie::refresh_token_from_headers(&headers));
    let Some(token) = supplied else {
        return Err(ApiError::Unauthorized("Invalid refresh token".to_string()));
    };

    let mut store = state.store.write().await;

    // A consumed credential is gone from every set; reuse lands here and is
    // rejected rather than resurrected.
    let Some(idx) = store
        .accounts
        .iter()
        .position(|a| a.refresh_tokens.iter().any(|t| *t == token))
    else {
        return Err(ApiError::Unauthorized("Invalid refresh token".to_string()));
    };

    let fresh = auth::generate_secure_token();
    let account = &mut store.accounts[idx];
    account.refresh_tokens.retain(|t| *t != token);
    account.refresh_tokens.push(fresh.clone());
    store.persist_accounts()?;
    let account = store.accounts[idx].clone();
    drop(store);

    mint_auth_response(&state, &account, &fresh)
}

/// Revoke a refresh credential. Idempotent: revoking an absent or
/// already-revoked credential still succeeds.
#[utoipa::path(
    post,
    path = "/accounts/revoke-token",
    request_body = RevokeTokenRequest,
    responses(
        (status = 200, description = "Revoked (or already absent)", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn revoke_token(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Response, ApiError> {
    let payload: RevokeTokenRequest = optional_body(&body);
    let cookie_token = cookie::refresh_token_from_headers(&headers);
    let target = payload
        .token
        .filter(|t| !t.is_empty())
        .or_else(|| cookie_token.clone());

    if let Some(ref token) = target {
        let mut store = state.store.write().await;
        if let Some(account) = store.account_mut(caller.id) {
            account.refresh_tokens.retain(|t| t != token);
        }
        store.persist_accounts()?;
    }

    let mut response = Json(MessageResponse::new("Token revoked")).into_response();
    if target.is_some() && target == cookie_token {
        let value = HeaderValue::from_str(&cookie::clear_refresh_cookie())
            .map_err(|e| ApiError::Internal(format!("Invalid cookie value: {}", e)))?;
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// Register a new account.
///
/// The first account ever registered becomes an Admin and can sign in
/// immediately; every later account starts Inactive and unverified, with a
/// verification notice emitted out of band.
#[utoipa::path(
    post,
    path = "/accounts/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = MessageResponse),
        (status = 400, description = "Missing fields or email already registered", body = crate::error::ErrorBody)
    ),
    tag = "accounts"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let mut store = state.store.write().await;
    if store.account_by_email(&payload.email).is_some() {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let first_account = store.accounts.is_empty();
    let verification_token = (!first_account).then(auth::generate_secure_token);

    let account = Account {
        id: store.next_account_id(),
        title: payload.title,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email.clone(),
        password_hash: auth::hash_password(&payload.password)?,
        role: if first_account { Role::Admin } else { Role::User },
        employee_id: None,
        status: if first_account {
            AccountStatus::Active
        } else {
            AccountStatus::Inactive
        },
        is_verified: first_account,
        verification_token: verification_token.clone(),
        reset_token: None,
        reset_token_expires: None,
        refresh_tokens: Vec::new(),
        created: Utc::now(),
        updated: None,
    };
    store.accounts.push(account);
    store.persist_accounts()?;
    drop(store);

    let message = if first_account {
        "Registration successful. The first account has been registered as an administrator and can sign in immediately."
    } else {
        if let Some(token) = verification_token {
            state.outbox.record(Notice::Verification {
                email: payload.email,
                token,
            });
        }
        "Registration successful, please check your email for verification instructions"
    };
    Ok(Json(MessageResponse::new(message)))
}

/// Verify an email address with the token from the registration notice.
#[utoipa::path(
    post,
    path = "/accounts/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Verified", body = MessageResponse),
        (status = 400, description = "Unknown token", body = crate::error::ErrorBody)
    ),
    tag = "accounts"
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;

    let Some(account) = store
        .accounts
        .iter_mut()
        .find(|a| a.verification_token.as_deref() == Some(payload.token.as_str()))
    else {
        return Err(ApiError::BadRequest("Verification failed".to_string()));
    };

    // Re-verification is defined as success.
    if !account.is_verified {
        account.is_verified = true;
        account.status = AccountStatus::Active;
        account.verification_token = None;
        account.updated = Some(Utc::now());
        store.persist_accounts()?;
    }

    Ok(Json(MessageResponse::new(
        "Verification successful, you can now login",
    )))
}

/// Start a password reset.
///
/// Replies with the same message whether or not the email exists, so the
/// endpoint cannot be used to enumerate accounts.
#[utoipa::path(
    post,
    path = "/accounts/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Always the same generic message", body = MessageResponse)
    ),
    tag = "accounts"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    let ttl_hours = state.config.reset_token_ttl_hours;

    if let Some(account) = store.accounts.iter_mut().find(|a| a.email == payload.email) {
        let token = auth::generate_secure_token();
        account.reset_token = Some(token.clone());
        account.reset_token_expires = Some(Utc::now() + Duration::hours(ttl_hours));
        let email = account.email.clone();
        store.persist_accounts()?;
        state.outbox.record(Notice::PasswordReset { email, token });
    }

    Ok(Json(MessageResponse::new(
        "Please check your email for password reset instructions",
    )))
}

/// Check a password-reset token without consuming it.
#[utoipa::path(
    post,
    path = "/accounts/validate-reset-token",
    request_body = ValidateResetTokenRequest,
    responses(
        (status = 200, description = "Token is valid", body = MessageResponse),
        (status = 400, description = "Unknown or expired token", body = crate::error::ErrorBody)
    ),
    tag = "accounts"
)]
pub async fn validate_reset_token(
    State(state): State<AppState>,
    Json(payload): Json<ValidateResetTokenRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let store = state.store.read().await;
    let now = Utc::now();

    let valid = store.accounts.iter().any(|a| {
        a.reset_token.as_deref() == Some(payload.token.as_str())
            && a.reset_token_expires.is_some_and(|exp| exp > now)
    });
    if !valid {
        return Err(ApiError::BadRequest("Invalid token".to_string()));
    }
    Ok(Json(MessageResponse::new("Token is valid")))
}

/// Set a new password with a valid reset token.
#[utoipa::path(
    post,
    path = "/accounts/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Unknown/expired token or missing password", body = crate::error::ErrorBody)
    ),
    tag = "accounts"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.password.is_empty() {
        return Err(ApiError::Validation("Password is required".to_string()));
    }
    let password_hash = auth::hash_password(&payload.password)?;

    let mut store = state.store.write().await;
    let now = Utc::now();

    let Some(account) = store.accounts.iter_mut().find(|a| {
        a.reset_token.as_deref() == Some(payload.token.as_str())
            && a.reset_token_expires.is_some_and(|exp| exp > now)
    }) else {
        return Err(ApiError::BadRequest("Invalid token".to_string()));
    };

    account.password_hash = password_hash;
    account.is_verified = true;
    account.status = AccountStatus::Active;
    account.reset_token = None;
    account.reset_token_expires = None;
    account.updated = Some(now);
    store.persist_accounts()?;

    Ok(Json(MessageResponse::new(
        "Password reset successful, you can now login",
    )))
}

/// List all accounts (admin only).
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "All accounts", body = [AccountResponse]),
        (status = 403, description = "Not an admin", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.accounts.iter().map(AccountResponse::from).collect()))
}

/// Create an account (admin only). Admin-created accounts skip
/// verification and start Active.
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Created", body = AccountResponse),
        (status = 400, description = "Missing fields or duplicate email", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_caller): RequireAdmin,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<Response, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let mut store = state.store.write().await;
    if store.account_by_email(&payload.email).is_some() {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let account = Account {
        id: store.next_account_id(),
        title: payload.title,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password_hash: auth::hash_password(&payload.password)?,
        role: payload.role,
        employee_id: payload.employee_id,
        status: AccountStatus::Active,
        is_verified: true,
        verification_token: None,
        reset_token: None,
        reset_token_expires: None,
        refresh_tokens: Vec::new(),
        created: Utc::now(),
        updated: None,
    };
    let response = AccountResponse::from(&account);
    store.accounts.push(account);
    store.persist_accounts()?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Fetch one account. Admins may fetch any; a non-admin only their own.
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(("id" = u64, Path, description = "Account id")),
    responses(
        (status = 200, description = "The account", body = AccountResponse),
        (status = 403, description = "Not your account", body = crate::error::ErrorBody),
        (status = 404, description = "No such account", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathId(id): PathId,
) -> Result<Json<AccountResponse>, ApiError> {
    if !caller.is_admin() && caller.id != id {
        return Err(ApiError::Forbidden(
            "You do not have permission to access this resource".to_string(),
        ));
    }
    let store = state.store.read().await;
    let account = store
        .account(id)
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;
    Ok(Json(AccountResponse::from(account)))
}

/// Update an account. Admins may update any; a non-admin only their own,
/// and never their own role.
#[utoipa::path(
    put,
    path = "/accounts/{id}",
    params(("id" = u64, Path, description = "Account id")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated", body = AccountResponse),
        (status = 400, description = "Duplicate email", body = crate::error::ErrorBody),
        (status = 403, description = "Ownership or role violation", body = crate::error::ErrorBody),
        (status = 404, description = "No such account", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn update(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathId(id): PathId,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    if !caller.is_admin() {
        if caller.id != id {
            return Err(ApiError::Forbidden(
                "You do not have permission to access this resource".to_string(),
            ));
        }
        if payload.role.is_some_and(|role| role != caller.role) {
            return Err(ApiError::Forbidden(
                "You are not allowed to change your own role".to_string(),
            ));
        }
    }

    let mut store = state.store.write().await;
    let Some(idx) = store.accounts.iter().position(|a| a.id == id) else {
        return Err(ApiError::NotFound("Account not found".to_string()));
    };

    if let Some(ref email) = payload.email {
        if store.accounts.iter().any(|a| a.id != id && a.email == *email) {
            return Err(ApiError::Conflict("Email is already registered".to_string()));
        }
    }
    let password_hash = match payload.password.as_deref() {
        Some(p) if !p.is_empty() => Some(auth::hash_password(p)?),
        _ => None,
    };

    let account = &mut store.accounts[idx];
    if payload.title.is_some() {
        account.title = payload.title;
    }
    if payload.first_name.is_some() {
        account.first_name = payload.first_name;
    }
    if payload.last_name.is_some() {
        account.last_name = payload.last_name;
    }
    if let Some(email) = payload.email {
        account.email = email;
    }
    if let Some(hash) = password_hash {
        account.password_hash = hash;
    }
    if let Some(role) = payload.role {
        account.role = role;
    }
    if let Some(employee_id) = payload.employee_id {
        account.employee_id = Some(employee_id);
    }
    if let Some(status) = payload.status {
        account.status = status;
    }
    account.updated = Some(Utc::now());
    let response = AccountResponse::from(&*account);
    store.persist_accounts()?;

    Ok(Json(response))
}

/// Delete an account. Admins may delete any; a non-admin only their own.
/// Deleting the last remaining admin is always rejected.
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    params(("id" = u64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Would remove the last admin", body = crate::error::ErrorBody),
        (status = 403, description = "Not your account", body = crate::error::ErrorBody),
        (status = 404, description = "No such account", body = crate::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathId(id): PathId,
) -> Result<Json<MessageResponse>, ApiError> {
    if !caller.is_admin() && caller.id != id {
        return Err(ApiError::Forbidden(
            "You do not have permission to access this resource".to_string(),
        ));
    }

    let mut store = state.store.write().await;
    let Some(target) = store.account(id) else {
        return Err(ApiError::NotFound("Account not found".to_string()));
    };

    if target.role == Role::Admin && store.admin_count() == 1 {
        return Err(ApiError::InvariantViolation(
            "Cannot delete the last admin account".to_string(),
        ));
    }

    store.accounts.retain(|a| a.id != id);
    store.persist_accounts()?;

    Ok(Json(MessageResponse::new("Account deleted")))
}
