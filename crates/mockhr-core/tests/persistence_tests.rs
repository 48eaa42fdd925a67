//! Accounts surviving a process restart via the on-disk accounts file.

use mockhr_core::config::Config;
use mockhr_core::TestApp;

fn config_with_data_dir(dir: &std::path::Path) -> Config {
    let mut config = Config::for_tests();
    config.data_dir = Some(dir.to_path_buf());
    config
}

#[tokio::test]
async fn accounts_survive_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");

    // First process: register and verify a new account.
    {
        let app = TestApp::with_config(config_with_data_dir(dir.path())).await;
        let res = app
            .client
            .post(
                &app.url("/accounts/register"),
                r#"{"email":"persisted@example.com","password":"secret123"}"#,
            )
            .await;
        assert_eq!(res.status, 200);

        let token = app
            .verification_token_for("persisted@example.com")
            .expect("verification notice missing");
        let res = app
            .client
            .post(
                &app.url("/accounts/verify-email"),
                &format!(r#"{{"token":"{}"}}"#, token),
            )
            .await;
        assert_eq!(res.status, 200);
    }

    let file = dir.path().join("mockhr-accounts.json");
    assert!(file.exists(), "accounts file missing after registration");
    let raw = std::fs::read_to_string(&file).expect("read accounts file");
    assert!(raw.contains("persisted@example.com"));
    assert!(!raw.contains("secret123"), "plaintext password on disk");

    // Second process on the same directory: the account is back, and so
    // are the seeded ones.
    let app = TestApp::with_config(config_with_data_dir(dir.path())).await;
    app.login("persisted@example.com", "secret123").await;
    let admin = app.admin_token().await;

    let res = app.client.get_with_auth(&app.url("/accounts"), &admin).await;
    assert_eq!(res.json().as_array().unwrap().len(), 3);

    // The id counter continues past the persisted maximum.
    let res = app
        .client
        .post_with_auth(
            &app.url("/accounts"),
            &admin,
            r#"{"email":"fresh@example.com","password":"secret123","role":"User"}"#,
        )
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.json()["id"], 4);
}

#[tokio::test]
async fn refresh_tokens_survive_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");

    let first = {
        let app = TestApp::with_config(config_with_data_dir(dir.path())).await;
        let res = app
            .client
            .post(
                &app.url("/accounts/authenticate"),
                r#"{"email":"user@example.com","password":"user"}"#,
            )
            .await;
        assert_eq!(res.status, 200);
        res.refresh_cookie().expect("refresh cookie missing")
    };

    let app = TestApp::with_config(config_with_data_dir(dir.path())).await;
    let res = app
        .client
        .post_with_cookie(&app.url("/accounts/refresh-token"), &first)
        .await;
    assert_eq!(res.status, 200, "persisted refresh token must rotate: {}", res.body);
}

#[tokio::test]
async fn without_a_data_dir_nothing_is_written() {
    let dir = tempfile::tempdir().expect("tempdir");

    let app = TestApp::with_config(Config::for_tests()).await;
    let res = app
        .client
        .post(
            &app.url("/accounts/register"),
            r#"{"email":"ephemeral@example.com","password":"secret123"}"#,
        )
        .await;
    assert_eq!(res.status, 200);

    assert!(!dir.path().join("mockhr-accounts.json").exists());
}
