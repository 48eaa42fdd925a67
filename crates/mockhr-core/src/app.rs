use axum::http::{Method, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::config::Config;
use crate::controllers::{self, AppState};
use crate::error::ApiError;
use crate::latency;
use crate::openapi::ApiDoc;

/// The mock HR API application.
pub struct App {
    pub config: Config,
    pub state: AppState,
}

impl App {
    /// Create the application with configuration from the environment.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_config(Config::from_env()?)
    }

    /// Create the application with a given config. Bootstraps the store,
    /// loading persisted accounts when a data directory is configured.
    pub fn with_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let state = AppState::new(config.clone())?;
        Ok(App { config, state })
    }

    /// Build the router: resource route tables, API docs, fallback 404,
    /// CORS, the latency layer and (development only) request-id and trace
    /// layers.
    ///
    /// Route patterns are disjoint by construction; axum panics here at
    /// startup if two registered patterns overlap.
    pub fn router(&self) -> Router {
        let state = self.state.clone();
        let is_dev = self.config.is_dev();

        let openapi_spec = ApiDoc::openapi();
        let openapi_spec_clone = openapi_spec.clone();

        let mut router = Router::new()
            .route("/", get(welcome))
            .merge(controllers::accounts::routes())
            .merge(controllers::employees::routes())
            .merge(controllers::departments::routes())
            .merge(controllers::workflows::routes())
            .merge(controllers::requests::routes())
            .with_state(state.clone())
            .merge(Scalar::with_url("/api-docs", openapi_spec))
            .route(
                "/api-docs/openapi.json",
                get(move || {
                    let spec = openapi_spec_clone.clone();
                    async move { Json(spec) }
                }),
            )
            .fallback(not_found)
            .layer(CorsLayer::permissive())
            .layer(axum::middleware::from_fn_with_state(
                state,
                latency::simulate_latency,
            ));

        // Only add the tracing/request-id middleware in development mode.
        if is_dev {
            use tower_http::trace::DefaultMakeSpan;
            use tower_http::trace::DefaultOnRequest;
            use tower_http::trace::DefaultOnResponse;
            use tower_http::LatencyUnit;

            let x_request_id = axum::http::HeaderName::from_static("x-request-id");
            router = router
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(
                            DefaultOnResponse::new()
                                .level(tracing::Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                );
        }

        router
    }

    /// Bind and serve until ctrl-c.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.server_addr();
        let router = self.router();

        println!("\nmockhr is running!");
        println!("   → Server:   http://{}", addr);
        println!("   → API docs: http://{}/api-docs", addr);
        println!();

        tracing::info!("mockhr server running on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutting down mockhr server...");
}

#[derive(Serialize)]
struct WelcomeMessage {
    message: &'static str,
    docs: &'static str,
    status: &'static str,
}

/// Welcome page at `/`.
async fn welcome() -> impl IntoResponse {
    Json(WelcomeMessage {
        message: "mockhr API is running",
        docs: "/api-docs",
        status: "running",
    })
}

/// Fallback for unmatched (method, path) pairs, naming both in the body.
async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Route not found for {} {}", method, uri.path()))
}
