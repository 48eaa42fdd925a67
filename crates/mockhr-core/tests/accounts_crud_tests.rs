//! Account CRUD: role enforcement, ownership, last-admin protection.

use mockhr_core::TestApp;

#[tokio::test]
async fn list_accounts_is_admin_only() {
    let app = TestApp::new().await;

    let user = app.user_token().await;
    let res = app.client.get_with_auth(&app.url("/accounts"), &user).await;
    assert_eq!(res.status, 403);

    let admin = app.admin_token().await;
    let res = app.client.get_with_auth(&app.url("/accounts"), &admin).await;
    assert_eq!(res.status, 200);
    let accounts = res.json();
    assert_eq!(accounts.as_array().unwrap().len(), 2);
    assert!(!res.body.contains("passwordHash"));
    assert!(!res.body.contains("refreshTokens"));
}

#[tokio::test]
async fn non_admin_may_only_read_own_account() {
    let app = TestApp::new().await;
    let user = app.user_token().await;

    let own = app.client.get_with_auth(&app.url("/accounts/2"), &user).await;
    assert_eq!(own.status, 200);
    assert_eq!(own.json()["email"], "user@example.com");

    let other = app.client.get_with_auth(&app.url("/accounts/1"), &user).await;
    assert_eq!(other.status, 403);
}

#[tokio::test]
async fn admin_reads_any_account_and_404s_on_missing() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app.client.get_with_auth(&app.url("/accounts/2"), &admin).await;
    assert_eq!(res.status, 200);

    let res = app.client.get_with_auth(&app.url("/accounts/99"), &admin).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.message(), "Account not found");
}

#[tokio::test]
async fn non_admin_cannot_change_own_role() {
    let app = TestApp::new().await;
    let user = app.user_token().await;

    let res = app
        .client
        .put_with_auth(&app.url("/accounts/2"), &user, r#"{"role":"Admin"}"#)
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(res.message(), "You are not allowed to change your own role");

    // Sending the unchanged role is fine.
    let res = app
        .client
        .put_with_auth(
            &app.url("/accounts/2"),
            &user,
            r#"{"role":"User","firstName":"Normal"}"#,
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.json()["firstName"], "Normal");
    assert!(res.json()["updated"].is_string());
}

#[tokio::test]
async fn non_admin_cannot_touch_other_accounts() {
    let app = TestApp::new().await;
    let user = app.user_token().await;

    let res = app
        .client
        .put_with_auth(&app.url("/accounts/1"), &user, r#"{"firstName":"X"}"#)
        .await;
    assert_eq!(res.status, 403);

    let res = app.client.delete_with_auth(&app.url("/accounts/1"), &user).await;
    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn update_rejects_duplicate_email() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .put_with_auth(
            &app.url("/accounts/2"),
            &admin,
            r#"{"email":"admin@example.com"}"#,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Email is already registered");
}

#[tokio::test]
async fn empty_password_on_update_keeps_the_old_one() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .put_with_auth(&app.url("/accounts/2"), &admin, r#"{"password":""}"#)
        .await;
    assert_eq!(res.status, 200);

    // Old password still authenticates.
    app.user_token().await;
}

#[tokio::test]
async fn deleting_the_last_admin_is_always_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app.client.delete_with_auth(&app.url("/accounts/1"), &admin).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Cannot delete the last admin account");

    // Promote the user, delete the original admin, then the new sole admin
    // is protected in turn.
    let res = app
        .client
        .put_with_auth(&app.url("/accounts/2"), &admin, r#"{"role":"Admin"}"#)
        .await;
    assert_eq!(res.status, 200);

    let res = app.client.delete_with_auth(&app.url("/accounts/1"), &admin).await;
    assert_eq!(res.status, 200);

    let promoted = app.login("user@example.com", "user").await;
    let res = app
        .client
        .delete_with_auth(&app.url("/accounts/2"), &promoted)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Cannot delete the last admin account");
}

#[tokio::test]
async fn admin_created_accounts_skip_verification() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/accounts"),
            &admin,
            r#"{"firstName":"Direct","email":"direct@example.com","password":"secret123","role":"User"}"#,
        )
        .await;
    assert_eq!(res.status, 201);
    let json = res.json();
    assert_eq!(json["isVerified"], true);
    assert_eq!(json["status"], "Active");
    assert_eq!(json["id"], 3);

    // Can sign in immediately.
    app.login("direct@example.com", "secret123").await;
}

#[tokio::test]
async fn create_account_requires_admin_and_unique_email() {
    let app = TestApp::new().await;
    let user = app.user_token().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/accounts"),
            &user,
            r#"{"email":"x@example.com","password":"p","role":"User"}"#,
        )
        .await;
    assert_eq!(res.status, 403);

    let admin = app.admin_token().await;
    let res = app
        .client
        .post_with_auth(
            &app.url("/accounts"),
            &admin,
            r#"{"email":"user@example.com","password":"p","role":"User"}"#,
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Email is already registered");
}

#[tokio::test]
async fn non_admin_may_delete_own_account() {
    let app = TestApp::new().await;
    let user = app.user_token().await;

    let res = app.client.delete_with_auth(&app.url("/accounts/2"), &user).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.message(), "Account deleted");

    let res = app
        .client
        .post(
            &app.url("/accounts/authenticate"),
            r#"{"email":"user@example.com","password":"user"}"#,
        )
        .await;
    assert_eq!(res.status, 400);
}
