//! History item domain model.

use crate::module::ProcessModule;
use crate::solve::SolutionResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of history items retained per user. Inserting past the
/// limit evicts the oldest item.
pub const HISTORY_LIMIT: usize = 50;

/// One past solve, captured at submit time.
///
/// Never mutated after creation except when a deferred visual is patched in;
/// that patch is matched by the item's unique `id`, not by input equality,
/// so repeated submissions of the same text stay unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Locally generated unique token (UUID v4).
    pub id: String,
    /// Creation time, RFC 3339.
    pub timestamp: String,
    pub module_id: String,
    pub module_title: String,
    pub input: String,
    pub result: SolutionResult,
}

impl HistoryItem {
    /// Captures a successful solve as a history item.
    pub fn new(module: &ProcessModule, input: impl Into<String>, result: SolutionResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            module_id: module.id.clone(),
            module_title: module.title.clone(),
            input: input.into(),
            result,
        }
    }
}
