//! Unified path management for SolveSphere configuration files.
//!
//! All configuration, secrets, and history data live under the platform
//! config directory. This keeps every storage module pointed at the same
//! tree on Linux, macOS, and Windows.

use solvesphere_core::secret::{GeminiConfig, SecretConfig};
use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for SolveSphere.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/solvesphere/           # Config directory
/// ├── secret.json                  # API keys
/// └── history/                     # Per-user solve history
///     └── solvesphere_history_<username>.json
/// ```
pub struct SpherePaths;

impl SpherePaths {
    /// Returns the SolveSphere configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("solvesphere"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the per-user history directory.
    pub fn history_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("history"))
    }

    /// Ensures the secret file exists, creating it with a template if it
    /// doesn't.
    ///
    /// The template contains an empty Gemini API key and the default model
    /// names so the user only has to paste their key. File permissions are
    /// set to 600 (user read/write only) on Unix systems.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the secret file (existing or newly created)
    /// - `Err(std::io::Error)`: If file creation or permission setting fails
    pub fn ensure_secret_file() -> Result<PathBuf, std::io::Error> {
        let secret_path = Self::secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template_config = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: Some("gemini-3-pro-preview".to_string()),
                image_model_name: Some("gemini-2.5-flash-image".to_string()),
            }),
        };

        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = SpherePaths::config_dir().unwrap();
        assert!(config_dir.ends_with("solvesphere"));
    }

    #[test]
    fn test_secret_file() {
        let secret_file = SpherePaths::secret_file().unwrap();
        assert!(secret_file.ends_with("secret.json"));
        let config_dir = SpherePaths::config_dir().unwrap();
        assert!(secret_file.starts_with(&config_dir));
    }

    #[test]
    fn test_history_dir() {
        let history_dir = SpherePaths::history_dir().unwrap();
        assert!(history_dir.ends_with("history"));
        let config_dir = SpherePaths::config_dir().unwrap();
        assert!(history_dir.starts_with(&config_dir));
    }
}
