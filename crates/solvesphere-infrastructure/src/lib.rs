//! Infrastructure layer: path management, secret storage, and history
//! persistence for SolveSphere.

pub mod credential;
pub mod history_repository;
pub mod history_storage;
pub mod paths;
pub mod secret_storage;

pub use credential::FileCredentialGate;
pub use history_repository::FileHistoryRepository;
pub use history_storage::{HistoryStorage, HistoryStorageError};
pub use paths::SpherePaths;
pub use secret_storage::{SecretStorage, SecretStorageError};
