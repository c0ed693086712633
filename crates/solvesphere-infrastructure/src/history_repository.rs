//! File-backed history repository.

use crate::history_storage::HistoryStorage;
use crate::paths::SpherePaths;
use solvesphere_core::error::{Result, SphereError};
use solvesphere_core::history::{HistoryItem, HistoryRepository};
use std::path::PathBuf;

/// History repository over per-user JSON files.
///
/// Load failures are swallowed: a corrupt or unreadable file is logged and
/// treated as an empty history, so a bad write can never lock a user out
/// of the dashboard. Save failures propagate.
pub struct FileHistoryRepository {
    storage: HistoryStorage,
}

impl FileHistoryRepository {
    pub fn new() -> Result<Self> {
        let dir = SpherePaths::history_dir()
            .map_err(|e| SphereError::config(format!("Failed to locate history dir: {}", e)))?;
        Ok(Self {
            storage: HistoryStorage::new(dir),
        })
    }

    /// Creates a repository rooted at a custom directory (for testing).
    pub fn with_dir(dir: PathBuf) -> Self {
        Self {
            storage: HistoryStorage::new(dir),
        }
    }
}

#[async_trait::async_trait]
impl HistoryRepository for FileHistoryRepository {
    async fn load(&self, user: &str) -> Result<Vec<HistoryItem>> {
        match self.storage.load(user) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!("Failed to load history for '{}': {}; starting empty", user, e);
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, user: &str, items: &[HistoryItem]) -> Result<()> {
        self.storage
            .save(user, items)
            .map_err(|e| SphereError::data_access(format!("Failed to save history: {}", e)))
    }

    async fn clear(&self, user: &str) -> Result<()> {
        self.storage
            .clear(user)
            .map_err(|e| SphereError::data_access(format!("Failed to clear history: {}", e)))
    }
}
