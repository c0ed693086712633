//! User session domain model.
//!
//! Created at login and held only in memory. Logout drops it; history is
//! keyed by name and survives.

use crate::module::AppMode;
use serde::{Deserialize, Serialize};

/// The locally entered identity for the current dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// Display name, also the history storage key.
    pub name: String,
    /// The role the user picked at login.
    pub role: AppMode,
}

impl UserSession {
    pub fn new(name: impl Into<String>, role: AppMode) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let user = UserSession::new("ada", AppMode::Student);
        assert_eq!(user.name, "ada");
        assert_eq!(user.role, AppMode::Student);
    }
}
