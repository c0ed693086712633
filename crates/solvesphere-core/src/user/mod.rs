//! User session domain model.

pub mod model;

pub use model::UserSession;
