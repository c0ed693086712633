//! History persistence trait.

use super::model::HistoryItem;
use crate::error::Result;

/// Persistence backend for per-user solve history.
///
/// Implementations key storage by user name. `load` is called once at
/// session start; `save` after every history mutation.
#[async_trait::async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Loads the full history for a user, most recent first.
    ///
    /// Implementations treat unreadable or corrupt storage as "no history"
    /// and return an empty list rather than an error.
    async fn load(&self, user: &str) -> Result<Vec<HistoryItem>>;

    /// Replaces the stored history for a user.
    async fn save(&self, user: &str, items: &[HistoryItem]) -> Result<()>;

    /// Removes all stored history for a user.
    async fn clear(&self, user: &str) -> Result<()>;
}
