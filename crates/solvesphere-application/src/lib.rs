//! Application layer for SolveSphere.
//!
//! [`Dashboard`] is the use case wiring the session store, the reasoning
//! client, the history repository, and the credential gate together.

pub mod dashboard;


pub use dashboard::Dashboard;
