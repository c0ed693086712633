//! Reasoning client seam.
//!
//! The domain layer defines the client trait; `solvesphere-interaction`
//! provides the Gemini REST implementation. Tests substitute mocks.

use super::error::SolveFailure;
use super::model::{InlineImage, SolutionResult};
use tokio_util::sync::CancellationToken;

/// Everything one solve call needs: the module's instruction template, the
/// user's input, an optional problem image, and the search flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRequest {
    pub prompt_template: String,
    pub input: String,
    pub image: Option<InlineImage>,
    pub use_search: bool,
}

impl SolveRequest {
    /// A solve request must carry text or an image.
    pub fn has_content(&self) -> bool {
        !self.input.trim().is_empty() || self.image.is_some()
    }
}

/// Inputs for one image render call.
///
/// `realistic` selects the photorealistic prompt style and aspect ratio;
/// otherwise the schematic flat style is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub description: String,
    pub context: String,
    pub realistic: bool,
}

/// Client for the hosted reasoning model.
///
/// Implementations are stateless between calls; the caller owns the
/// cancellation token for the in-flight request. Both operations classify
/// every failure into [`SolveFailure`] before returning, and both observe
/// the token before issuing the network call and after it returns.
#[async_trait::async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Produces a schema-validated structured solution.
    async fn solve(
        &self,
        request: SolveRequest,
        cancel: &CancellationToken,
    ) -> Result<SolutionResult, SolveFailure>;

    /// Produces an inline image for a diagram or simulation panel.
    async fn render_image(
        &self,
        request: ImageRequest,
        cancel: &CancellationToken,
    ) -> Result<InlineImage, SolveFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_content() {
        let mut request = SolveRequest {
            prompt_template: "Solve step by step.".to_string(),
            input: "   ".to_string(),
            image: None,
            use_search: false,
        };
        assert!(!request.has_content());

        request.input = "Solve 2x+3=7".to_string();
        assert!(request.has_content());

        request.input.clear();
        request.image = Some(InlineImage::new("image/png", "QUJD"));
        assert!(request.has_content());
    }
}
