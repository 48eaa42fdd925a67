//! Resource handlers, one module per resource, each exporting a
//! `routes() -> Router<AppState>` table that the app assembles at startup.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::ApiError;
use crate::notify::Outbox;
use crate::storage::AccountsFile;
use crate::store::Store;

pub mod accounts;
pub mod departments;
pub mod employees;
pub mod requests;
pub mod workflows;

/// Shared application state available in all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub config: Arc<Config>,
    pub outbox: Outbox,
}

impl AppState {
    /// Bootstrap the store (loading persisted accounts when configured)
    /// and wrap everything for sharing across handlers.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let accounts_file = config.data_dir.as_deref().map(AccountsFile::new);
        let store = Store::bootstrap(accounts_file)?;
        Ok(AppState {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
            outbox: Outbox::new(),
        })
    }
}

/// Plain `{"message": "..."}` success body.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
