//! Per-user history file storage.
//!
//! Each user's history is one JSON array at
//! `<config>/history/solvesphere_history_<username>.json`, written after
//! every mutation and read once at session start. Writes go through a tmp
//! file + atomic rename so a crash mid-write never corrupts the stored
//! history.

use solvesphere_core::history::HistoryItem;
use std::fs;
use std::io::Write as IoWrite;
use std::path::PathBuf;

/// Errors that can occur during history storage operations.
#[derive(Debug)]
pub enum HistoryStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for HistoryStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            HistoryStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for HistoryStorageError {}

impl From<std::io::Error> for HistoryStorageError {
    fn from(e: std::io::Error) -> Self {
        HistoryStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for HistoryStorageError {
    fn from(e: serde_json::Error) -> Self {
        HistoryStorageError::ParseError(e)
    }
}

/// File storage for per-user history arrays.
pub struct HistoryStorage {
    dir: PathBuf,
}

impl HistoryStorage {
    /// Creates storage rooted at the given directory.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of one user's history file.
    pub fn file_for(&self, user: &str) -> PathBuf {
        self.dir
            .join(format!("solvesphere_history_{}.json", sanitize_user(user)))
    }

    /// Loads a user's history. A missing file is an empty history.
    pub fn load(&self, user: &str) -> Result<Vec<HistoryItem>, HistoryStorageError> {
        let path = self.file_for(user);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        let items = serde_json::from_str(&content)?;
        Ok(items)
    }

    /// Replaces a user's stored history via tmp file + atomic rename.
    pub fn save(&self, user: &str, items: &[HistoryItem]) -> Result<(), HistoryStorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.file_for(user);
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(items)?;

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Removes a user's history file. Missing files are fine.
    pub fn clear(&self, user: &str) -> Result<(), HistoryStorageError> {
        let path = self.file_for(user);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Maps a display name onto a safe file name component.
///
/// Alphanumerics, `-`, and `_` pass through; everything else becomes `_`.
fn sanitize_user(user: &str) -> String {
    user.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
