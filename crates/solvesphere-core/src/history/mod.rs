//! Bounded, persisted solve history.

pub mod model;
pub mod repository;

pub use model::{HistoryItem, HISTORY_LIMIT};
pub use repository::HistoryRepository;
