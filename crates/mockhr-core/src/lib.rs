//! mockhr — an embeddable mock HR-management API server.
//!
//! Emulates the REST backend of an HR single-page application (accounts,
//! employees, departments, workflows, requests) with realistic protocol
//! behavior: bearer-token authentication, role enforcement, refresh-token
//! rotation, referential-integrity errors and simulated network latency.
//! State lives in memory; only the accounts collection is persisted to disk
//! so registered accounts survive restarts.
//!
//! ```rust,no_run
//! use mockhr_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!     let app = App::new()?;
//!     app.run().await?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod auth;
pub mod config;
pub mod controllers;
pub mod error;
pub mod extractors;
pub mod latency;
pub mod logging;
pub mod models;
pub mod notify;
pub mod openapi;
pub mod storage;
pub mod store;
pub mod testing;

pub use app::App;
pub use config::Config;
pub use controllers::AppState;
pub use error::ApiError;
pub use notify::{Notice, Outbox};
pub use store::Store;
pub use testing::{TestApp, TestClient, TestResponse};

/// Commonly used items, for `use mockhr_core::prelude::*;`.
pub mod prelude {
    pub use crate::app::App;
    pub use crate::config::Config;
    pub use crate::error::ApiError;
    pub use crate::logging::{init_logging, init_logging_json};
}
