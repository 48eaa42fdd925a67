//! Durable persistence for the accounts collection.
//!
//! Accounts are the only collection that survives restarts: one JSON array
//! under a single namespaced file, written through synchronously after
//! every mutation. Everything else resets each run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ApiError;
use crate::models::Account;

/// File name of the single durable record.
pub const ACCOUNTS_FILE: &str = "mockhr-accounts.json";

/// Handle to the persisted accounts file.
#[derive(Debug, Clone)]
pub struct AccountsFile {
    path: PathBuf,
}

impl AccountsFile {
    pub fn new(data_dir: &Path) -> Self {
        AccountsFile {
            path: data_dir.join(ACCOUNTS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all persisted accounts. A missing file is an empty collection;
    /// an unreadable or corrupt file fails loudly so memory and disk never
    /// silently diverge.
    pub fn load(&self) -> Result<Vec<Account>, ApiError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            ApiError::Internal(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            ApiError::Internal(format!("Corrupt accounts file {}: {}", self.path.display(), e))
        })
    }

    /// Write the full accounts array. Creates the data directory on first
    /// use. Must complete before a mutating account response is produced.
    pub fn save(&self, accounts: &[Account]) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ApiError::Internal(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_vec_pretty(accounts)
            .map_err(|e| ApiError::Internal(format!("Failed to encode accounts: {}", e)))?;
        fs::write(&self.path, json).map_err(|e| {
            ApiError::Internal(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}
