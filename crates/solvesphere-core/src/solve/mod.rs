//! Solve domain: structured results, the failure taxonomy, and the
//! reasoning client seam.

pub mod client;
pub mod error;
pub mod model;

pub use client::{ImageRequest, ReasoningClient, SolveRequest};
pub use error::SolveFailure;
pub use model::{DiagramNode, GroundingLink, InlineImage, SolutionResult};
