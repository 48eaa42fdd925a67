use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role. `Admin` may act on any resource; `User` is restricted to
/// resources linked to their own account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    User,
}

/// Account lifecycle status. Inactive accounts cannot authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// Identity and auth record.
///
/// This is the full internal (and persisted) shape; it is never serialized
/// on the wire. Responses use [`AccountResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Unique across all accounts.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
    /// Back-reference to the linked Employee, when one exists.
    #[serde(default)]
    pub employee_id: Option<u64>,
    pub status: AccountStatus,
    pub is_verified: bool,
    #[serde(default)]
    pub verification_token: Option<String>,
    #[serde(default)]
    pub reset_token: Option<String>,
    #[serde(default)]
    pub reset_token_expires: Option<DateTime<Utc>>,
    /// Currently-valid rotating refresh credentials. A credential removed
    /// from this set is dead for good; presenting it again is rejected.
    #[serde(default)]
    pub refresh_tokens: Vec<String>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Public projection of an [`Account`]. Password hash and all token
/// material stay server-side.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<u64>,
    pub status: AccountStatus,
    pub is_verified: bool,
    pub created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        AccountResponse {
            id: account.id,
            title: account.title.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            role: account.role,
            employee_id: account.employee_id,
            status: account.status,
            is_verified: account.is_verified,
            created: account.created,
            updated: account.updated,
        }
    }
}

/// Successful authenticate/refresh response: the public account fields
/// plus a freshly minted access token. The rotating refresh credential
/// travels only in the `Set-Cookie` side channel.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub jwt_token: String,
}

impl AuthResponse {
    pub fn new(account: &Account, jwt_token: String) -> Self {
        AuthResponse {
            account: AccountResponse::from(account),
            jwt_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Account {
        Account {
            id: 7,
            title: Some("Mr".into()),
            first_name: Some("Sam".into()),
            last_name: None,
            email: "sam@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::User,
            employee_id: Some(3),
            status: AccountStatus::Active,
            is_verified: true,
            verification_token: Some("vtok".into()),
            reset_token: None,
            reset_token_expires: None,
            refresh_tokens: vec!["rtok".into()],
            created: Utc::now(),
            updated: None,
        }
    }

    #[test]
    fn response_never_leaks_secrets() {
        let json = serde_json::to_value(AccountResponse::from(&sample())).unwrap();
        let text = json.to_string();
        assert!(!text.contains("argon2"));
        assert!(!text.contains("vtok"));
        assert!(!text.contains("rtok"));
        assert_eq!(json["employeeId"], 3);
        assert_eq!(json["isVerified"], true);
    }

    #[test]
    fn auth_response_flattens_account_fields() {
        let json = serde_json::to_value(AuthResponse::new(&sample(), "a.b.c".into())).unwrap();
        assert_eq!(json["jwtToken"], "a.b.c");
        assert_eq!(json["email"], "sam@example.com");
        assert_eq!(json["role"], "User");
    }
}
