//! Simulated network latency.
//!
//! Every response is delayed by a fixed amount so the front end behaves as
//! it would against a real server. The delay is a middleware layered
//! outside the router, so success, error and fallback 404 responses are
//! all observed after the simulated round trip. Handlers never hold the
//! store lock across this sleep.

use std::time::Duration;

use axum::{extract::Request, extract::State, middleware::Next, response::Response};

use crate::controllers::AppState;

pub async fn simulate_latency(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let delay = state.config.latency_ms;
    let response = next.run(req).await;
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    response
}
