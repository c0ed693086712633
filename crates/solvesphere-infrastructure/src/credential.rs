//! File-backed credential gate.

use crate::paths::SpherePaths;
use crate::secret_storage::SecretStorage;
use solvesphere_core::error::{Result, SphereError};
use solvesphere_core::secret::CredentialGate;
use std::path::PathBuf;

/// Credential gate backed by the secret.json file.
///
/// `has_credential` requires the file to exist, parse, and carry a
/// non-empty Gemini API key. `open_credential_picker` writes the template
/// file (if missing) and hands back its path for the user to edit.
pub struct FileCredentialGate {
    storage: SecretStorage,
}

impl FileCredentialGate {
    pub fn new() -> Result<Self> {
        let storage = SecretStorage::new()
            .map_err(|e| SphereError::config(format!("Failed to locate secret storage: {}", e)))?;
        Ok(Self { storage })
    }

    /// Creates a gate over a custom secret file path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            storage: SecretStorage::with_path(path),
        }
    }
}

#[async_trait::async_trait]
impl CredentialGate for FileCredentialGate {
    async fn has_credential(&self) -> bool {
        match self.storage.load() {
            Ok(config) => config.has_api_key(),
            Err(_) => false,
        }
    }

    async fn open_credential_picker(&self) -> Result<PathBuf> {
        SpherePaths::ensure_secret_file()
            .map_err(|e| SphereError::config(format!("Failed to create secret template: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_means_no_credential() {
        let temp_dir = TempDir::new().unwrap();
        let gate = FileCredentialGate::with_path(temp_dir.path().join("secret.json"));
        assert!(!gate.has_credential().await);
    }

    #[tokio::test]
    async fn test_empty_key_means_no_credential() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        fs::write(&path, r#"{"gemini": {"api_key": ""}}"#).unwrap();

        let gate = FileCredentialGate::with_path(path);
        assert!(!gate.has_credential().await);
    }

    #[tokio::test]
    async fn test_configured_key_passes_the_gate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        fs::write(&path, r#"{"gemini": {"api_key": "key-123"}}"#).unwrap();

        let gate = FileCredentialGate::with_path(path);
        assert!(gate.has_credential().await);
    }
}
