//! Credential gate and secret configuration models.
//!
//! The dashboard checks the gate once at mount: with no usable credential
//! the view starts in the key-selection state.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
}

impl SecretConfig {
    /// A usable credential is a non-empty Gemini API key.
    pub fn has_api_key(&self) -> bool {
        self.gemini
            .as_ref()
            .is_some_and(|g| !g.api_key.trim().is_empty())
    }
}

/// Gemini API configuration.
///
/// `model_name` and `image_model_name` override the built-in defaults for
/// the solve and render calls respectively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_model_name: Option<String>,
}

/// Host capability gating the dashboard on a configured API credential.
///
/// # Security Note
///
/// Implementations must never include the credential itself in error
/// messages or logs.
#[async_trait::async_trait]
pub trait CredentialGate: Send + Sync {
    /// Whether a usable credential is configured.
    async fn has_credential(&self) -> bool;

    /// Opens the credential picker: ensures an editable credential file
    /// exists and returns its path for the user to fill in.
    async fn open_credential_picker(&self) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_api_key() {
        let mut config = SecretConfig::default();
        assert!(!config.has_api_key());

        config.gemini = Some(GeminiConfig {
            api_key: "  ".to_string(),
            model_name: None,
            image_model_name: None,
        });
        assert!(!config.has_api_key());

        config.gemini.as_mut().unwrap().api_key = "key-123".to_string();
        assert!(config.has_api_key());
    }

    #[test]
    fn test_secret_config_parses_minimal_json() {
        let config: SecretConfig = serde_json::from_str("{}").unwrap();
        assert!(config.gemini.is_none());

        let config: SecretConfig =
            serde_json::from_str(r#"{"gemini": {"api_key": "k"}}"#).unwrap();
        assert_eq!(config.gemini.unwrap().api_key, "k");
    }
}
