//! Integration-test harness.
//!
//! [`TestApp`] spins up a full server on a random port with zero latency
//! and no persistence, and exposes the shared state (store, outbox) so
//! tests can drive flows like register → verify-email → authenticate
//! without a mail server.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_authenticate() {
//!     let app = TestApp::new().await;
//!     let res = app
//!         .client
//!         .post(&app.url("/accounts/authenticate"),
//!               r#"{"email":"admin@example.com","password":"admin"}"#)
//!         .await;
//!     assert_eq!(res.status, 200);
//! }
//! ```

use std::net::SocketAddr;

use axum::http::HeaderMap;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::controllers::AppState;

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: TestClient,
    pub state: AppState,
    pub config: Config,
}

impl TestApp {
    /// Create a test app: zero latency, ephemeral store, fixed secret.
    pub async fn new() -> Self {
        Self::with_config(Config::for_tests()).await
    }

    /// Create a test app with a custom config.
    pub async fn with_config(config: Config) -> Self {
        let app = crate::App::with_config(config.clone()).expect("Failed to create test app");
        let state = app.state.clone();
        let router = app.router();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to get local addr");

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = TestClient::new(addr);

        TestApp {
            addr,
            client,
            state,
            config,
        }
    }

    /// Get the base URL for the test server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Authenticate and return the access token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let res = self
            .client
            .post(&self.url("/accounts/authenticate"), &body.to_string())
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.body);

        res.json()["jwtToken"]
            .as_str()
            .expect("jwtToken missing from auth response")
            .to_string()
    }

    /// Access token for the seeded admin account.
    pub async fn admin_token(&self) -> String {
        self.login("admin@example.com", "admin").await
    }

    /// Access token for the seeded non-admin account.
    pub async fn user_token(&self) -> String {
        self.login("user@example.com", "user").await
    }

    /// The most recent verification token the outbox holds for an email.
    pub fn verification_token_for(&self, email: &str) -> Option<String> {
        self.state.outbox.verification_token_for(email)
    }

    /// The most recent password-reset token the outbox holds for an email.
    pub fn reset_token_for(&self, email: &str) -> Option<String> {
        self.state.outbox.reset_token_for(email)
    }
}

/// A simple HTTP test client with helper methods.
#[derive(Clone)]
pub struct TestClient {
    inner: reqwest::Client,
    base_addr: SocketAddr,
}

impl TestClient {
    pub fn new(addr: SocketAddr) -> Self {
        TestClient {
            inner: reqwest::Client::new(),
            base_addr: addr,
        }
    }

    pub async fn get(&self, url: &str) -> TestResponse {
        let res = self.inner.get(url).send().await.expect("GET request failed");
        TestResponse::from_response(res).await
    }

    pub async fn get_with_auth(&self, url: &str, token: &str) -> TestResponse {
        let res = self
            .inner
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }

    pub async fn post(&self, url: &str, body: &str) -> TestResponse {
        let res = self
            .inner
            .post(url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    pub async fn post_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        let res = self
            .inner
            .post(url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .body(body.to_string())
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST carrying a `refreshToken` cookie (and no body), the way
    /// the browser client calls the token endpoints.
    pub async fn post_with_cookie(&self, url: &str, refresh_token: &str) -> TestResponse {
        let res = self
            .inner
            .post(url)
            .header("Content-Type", "application/json")
            .header("Cookie", format!("refreshToken={}", refresh_token))
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    pub async fn put_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        let res = self
            .inner
            .put(url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .body(body.to_string())
            .send()
            .await
            .expect("PUT request failed");
        TestResponse::from_response(res).await
    }

    pub async fn delete_with_auth(&self, url: &str, token: &str) -> TestResponse {
        let res = self
            .inner
            .delete(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("DELETE request failed");
        TestResponse::from_response(res).await
    }

    /// A CORS preflight request from a browser origin.
    pub async fn options_with_origin(&self, url: &str, origin: &str) -> TestResponse {
        let res = self
            .inner
            .request(reqwest::Method::OPTIONS, url)
            .header("Origin", origin)
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .expect("OPTIONS request failed");
        TestResponse::from_response(res).await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.base_addr)
    }
}

/// A simplified HTTP response for test assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
    pub headers: HeaderMap,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let body = res.text().await.unwrap_or_default();
        TestResponse {
            status,
            body,
            headers,
        }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Failed to parse response as JSON")
    }

    /// The `message` field of the body, or empty.
    pub fn message(&self) -> String {
        self.json()["message"].as_str().unwrap_or_default().to_string()
    }

    /// The refresh credential installed by this response's `Set-Cookie`
    /// header, if any.
    pub fn refresh_cookie(&self) -> Option<String> {
        let raw = self.headers.get("set-cookie")?.to_str().ok()?;
        let value = raw.strip_prefix("refreshToken=")?;
        let token = value.split(';').next()?.to_string();
        (!token.is_empty()).then_some(token)
    }
}
